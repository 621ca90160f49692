//! Send an RPS batch to BHISS.
//!
//! Run with: `cargo run --example recepcionar_lote -- nfse.yaml lote-assinado.xml`

use bhiss_nfse::{NfseClient, Settings};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(settings_path), Some(payload_path)) = (args.next(), args.next()) else {
        eprintln!("usage: recepcionar_lote <settings.yaml> <signed-batch.xml>");
        std::process::exit(2);
    };

    let settings = match Settings::load(&settings_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("  Settings: {e}");
            std::process::exit(2);
        }
    };
    let payload = match std::fs::read_to_string(&payload_path) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("  Payload {payload_path}: {e}");
            std::process::exit(2);
        }
    };

    println!("=== RecepcionarLoteRps ({:?}) ===\n", settings.environment);

    let result = NfseClient::connect(&settings, "RecepcionarLoteRpsRequest").and_then(|mut client| {
        client.set_payload(payload);
        client.call()
    });

    match result {
        Ok(response) => {
            println!("  HTTP {}", response.status);
            match response.output_xml() {
                Some(xml) => println!("  {xml}"),
                None => println!("  (no outputXML in response)"),
            }
        }
        Err(e) => {
            println!("  [{}] {}", e.kind(), e);
            if e.kind().is_retryable() {
                println!("  The service may recover; try again later.");
            }
            std::process::exit(1);
        }
    }
}
