//! Catalog commands: product list and product detail.

use std::io::{self, Write};

use pharmacy_core::{CatalogFilter, Drug, DrugId};
use pharmacy_storefront::error::StorefrontError;
use pharmacy_storefront::pages::{self, Page, ProductsView};
use pharmacy_storefront::state::AppState;

use super::Result;

/// List the catalog narrowed by form, symptom and name search.
pub async fn products(
    state: &AppState,
    form: &str,
    symptom: &str,
    search: &str,
    out: &mut impl Write,
) -> Result<()> {
    let filter = CatalogFilter::new(form, symptom, search);
    match pages::load_products(state.client(), state.session(), filter).await {
        Page::Ready(view) => Ok(write_products(&view, out)?),
        Page::LoginRequired => Err(StorefrontError::LoginRequired.into()),
        Page::NotFound => Err(StorefrontError::NotFound("Catalog".to_string()).into()),
    }
}

/// Show one product.
pub async fn product(state: &AppState, id: DrugId, out: &mut impl Write) -> Result<()> {
    match pages::load_product_detail(state.client(), state.session(), id).await {
        Page::Ready(drug) => Ok(write_drug_detail(&drug, out)?),
        Page::LoginRequired => Err(StorefrontError::LoginRequired.into()),
        Page::NotFound => Err(StorefrontError::NotFound(format!("Product {id}")).into()),
    }
}

fn write_products(view: &ProductsView, out: &mut impl Write) -> io::Result<()> {
    let options = view.options();
    writeln!(out, "Forms: All, {}", options.forms.join(", "))?;
    writeln!(out, "Symptoms: All, {}", options.symptoms.join(", "))?;
    writeln!(out)?;

    let visible = view.visible();
    if visible.is_empty() {
        writeln!(out, "No products match.")?;
    }
    for drug in &visible {
        write_drug_row(drug, out)?;
    }

    writeln!(out)?;
    writeln!(out, "{} of {} products", visible.len(), view.drugs().len())
}

fn write_drug_row(drug: &Drug, out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "{} {:>4}  {} ({}, {})  {}",
        drug.form_kind().icon(),
        drug.id.as_i64(),
        drug.name,
        drug.form,
        drug.dose,
        drug.price
    )
}

fn write_drug_detail(drug: &Drug, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{} {}", drug.form_kind().icon(), drug.name)?;
    writeln!(out, "  Code:         {}", drug.code)?;
    writeln!(out, "  Manufacturer: {}", drug.manufacturer)?;
    writeln!(out, "  Form:         {}", drug.form)?;
    writeln!(out, "  Dose:         {}", drug.dose)?;
    writeln!(out, "  Treats:       {}", drug.symptom_tags().collect::<Vec<_>>().join(", "))?;
    writeln!(out, "  In stock:     {}", drug.available_units)?;
    writeln!(out, "  Price:        {}", drug.price)?;
    writeln!(out)?;
    writeln!(out, "Add it with `pharmacy cart add {}`", drug.id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn drug(id: i64, name: &str, form: &str, symptom: &str, price: f64) -> Drug {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "code": format!("D{id}"),
            "name": name,
            "manufacturer": "Acme",
            "availableUnits": 12,
            "dose": "500mg",
            "form": form,
            "price": price,
            "symptom": symptom,
        }))
        .unwrap()
    }

    #[test]
    fn test_products_listing() {
        let view = ProductsView::new(
            vec![
                drug(1, "Paracetamol", "Tablet", "Fever, Headache", 9.99),
                drug(2, "Cough Syrup", "Syrup", "Cough", 5.5),
            ],
            CatalogFilter::new("Syrup", "All", ""),
        );

        let mut out = Vec::new();
        write_products(&view, &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();

        assert!(output.contains("Forms: All, Tablet, Syrup"));
        assert!(output.contains("Symptoms: All, Fever, Headache, Cough"));
        assert!(output.contains("Cough Syrup (Syrup, 500mg)  $5.50"));
        assert!(!output.contains("Paracetamol"));
        assert!(output.contains("1 of 2 products"));
    }

    #[test]
    fn test_empty_listing() {
        let view = ProductsView::new(Vec::new(), CatalogFilter::all());

        let mut out = Vec::new();
        write_products(&view, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("No products match."));
    }

    #[test]
    fn test_drug_detail() {
        let mut out = Vec::new();
        write_drug_detail(&drug(7, "Insulin", "Injection", "Diabetes", 25.0), &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();

        assert!(output.starts_with("💉 Insulin"));
        assert!(output.contains("Treats:       Diabetes"));
        assert!(output.contains("Price:        $25.00"));
        assert!(output.contains("pharmacy cart add 7"));
    }
}
