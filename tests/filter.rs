use serde_json::json;

use garrison_admin::domain::product::{Product, StockFilter};
use garrison_admin::filter::{FilterState, filtered_view};

fn products() -> Vec<Product> {
    serde_json::from_value(json!([
        {"id": 1, "description": "Whisky", "price": 30.0, "stock": 10},
        {"id": 2, "description": "Gorro", "price": 4.0, "stock": 0}
    ]))
    .unwrap()
}

#[test]
fn text_and_stock_filter_select_the_first_product() {
    let products = products();
    let filter = FilterState::new("whisky", Some(StockFilter::WithStock));

    let view = filtered_view(&products, &filter);

    assert_eq!(view.len(), 1);
    assert_eq!(view[0].description, "Whisky");
}

#[test]
fn view_is_identical_for_identical_inputs() {
    let products = products();
    let filter = FilterState::<StockFilter>::from_query(Some("o"), Some("without"));

    let first = filtered_view(&products, &filter);
    let second = filtered_view(&products, &filter);

    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].description, "Gorro");
}
