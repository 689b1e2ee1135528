//! Demonstration catalog for an empty first run.

use crate::product::ProductInput;

pub fn demo_products() -> Vec<ProductInput> {
    vec![
        ProductInput::new("HP Laptop 15s", "LAP-HP-15S")
            .with_category("Laptop")
            .with_quantity(8)
            .with_reorder_level(3)
            .with_price(45000.0),
        ProductInput::new("Logitech Wireless Mouse", "MOU-LOGI-M185")
            .with_category("Accessories")
            .with_quantity(25)
            .with_reorder_level(10)
            .with_price(699.0),
        ProductInput::new("Seagate 1TB HDD", "HDD-SG-1TB")
            .with_category("Storage")
            .with_quantity(5)
            .with_reorder_level(5)
            .with_price(3500.0),
    ]
}
