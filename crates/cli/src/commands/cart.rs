//! Cart commands.
//!
//! Only `add` talks to the backend (to fetch the drug record); the rest work
//! on the local store alone.

use std::io::{self, Write};

use pharmacy_core::{Cart, DrugId};
use pharmacy_storefront::error::StorefrontError;
use pharmacy_storefront::pages::{self, Page};
use pharmacy_storefront::state::AppState;

use super::Result;

/// List cart lines and the total.
pub fn show(state: &AppState, out: &mut impl Write) -> Result<()> {
    Ok(write_cart(&state.cart().load(), out)?)
}

/// Fetch a product and add one unit of it.
pub async fn add(state: &AppState, id: DrugId, out: &mut impl Write) -> Result<()> {
    let drug = match pages::load_product_detail(state.client(), state.session(), id).await {
        Page::Ready(drug) => drug,
        Page::LoginRequired => return Err(StorefrontError::LoginRequired.into()),
        Page::NotFound => return Err(StorefrontError::NotFound(format!("Product {id}")).into()),
    };

    let cart = state.cart().add_or_increment(&drug)?;
    let quantity = cart.get(id).map_or(0, |line| line.quantity);
    writeln!(out, "Added {} (now {quantity} in cart)", drug.name)?;
    Ok(write_cart(&cart, out)?)
}

/// Change a line's quantity by `delta`.
pub fn quantity(state: &AppState, id: DrugId, delta: i64, out: &mut impl Write) -> Result<()> {
    let cart = state.cart().change_quantity(id, delta)?;
    if cart.get(id).is_none() {
        writeln!(out, "Product {id} is not in the cart")?;
    }
    Ok(write_cart(&cart, out)?)
}

/// Remove a line.
pub fn remove(state: &AppState, id: DrugId, out: &mut impl Write) -> Result<()> {
    let cart = state.cart().remove(id)?;
    Ok(write_cart(&cart, out)?)
}

/// Empty the cart.
pub fn clear(state: &AppState, out: &mut impl Write) -> Result<()> {
    state.cart().clear()?;
    writeln!(out, "Cart cleared")?;
    Ok(())
}

fn write_cart(cart: &Cart, out: &mut impl Write) -> io::Result<()> {
    if cart.is_empty() {
        return writeln!(out, "Your cart is empty");
    }

    for line in cart.lines() {
        writeln!(
            out,
            "{:>4}  {} x {} @ {} = {}",
            line.id().as_i64(),
            line.quantity,
            line.drug.name,
            line.drug.price,
            line.line_total()
        )?;
    }
    writeln!(out, "Total: {} ({} item(s))", cart.total(), cart.item_count())
}
