use std::io::Write;
use tempfile::NamedTempFile;

/// Writes a workflow script, one JSON request per line, to a temp file.
pub fn write_script(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}

/// The standard happy-path script: one customer, two products, a paid order
/// walked through the whole approval chain.
pub fn lifecycle_script() -> NamedTempFile {
    write_script(&[
        r#"{"op":"createBankAccount","accountNo":"111122223333","accountName":"Alice","balance":5000,"accountSecret":"hunter2!"}"#,
        r#"{"op":"createProduct","name":"Keyboard","price":500,"description":"Mechanical","imageRef":"kb.png"}"#,
        r#"{"op":"createProduct","name":"Monitor","price":1000,"description":"27 inch","imageRef":"mon.png"}"#,
        r#"{"op":"addToCart","product":"Keyboard","quantity":2}"#,
        r#"{"op":"addToCart","product":"Monitor","quantity":1}"#,
        r#"{"op":"createOrder","accountNo":"111122223333"}"#,
        r#"{"op":"pay","accountNo":"111122223333","accountSecret":"hunter2!"}"#,
        r#"{"op":"approveOrderRequest"}"#,
        r#"{"op":"approveDeliveryRequest"}"#,
        r#"{"op":"approveSupplyRequest"}"#,
        r#"{"op":"getAccountInfo","accountNo":"111122223333"}"#,
    ])
}
