//! POST a two-field form and print the response text.
//!
//! Usage: `cargo run -p webreq-core --example post_form [URL]`

use webreq_core::{send, RequestError, RequestSpec, UreqTransport};

fn main() -> Result<(), RequestError> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://www.runoob.com/try/ajax/demo_post2.php".to_string());

    let spec = RequestSpec::post(url).text("fname", "awa").text("lname", "qwq");
    let mut response = send(&spec, &UreqTransport::new())?;
    println!("{}", response.read_text()?);
    Ok(())
}
