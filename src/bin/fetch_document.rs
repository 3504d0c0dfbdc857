//! CLI tool to load a document through the view proxy.
//!
//! Usage:
//!   cargo run --bin fetch-document -- --url https://cms.example.org/docs/report.pdf --type application/pdf

use std::env;
use std::path::PathBuf;

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use docdesk_lib::models::DocumentRef;
use docdesk_lib::viewer::{
    DocumentViewController, ObjectUrlRegistry, ProxyClient, ViewBody, ViewOptions,
};

const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:8080";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let args: Vec<String> = env::args().collect();

    let mut document = DocumentRef::default();
    let mut proxy_url =
        env::var("DOCDESK_PROXY_URL").unwrap_or_else(|_| DEFAULT_PROXY_URL.to_string());
    let mut out: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--url" | "-u" => {
                i += 1;
                if i < args.len() {
                    document.file_url = args[i].clone();
                }
            }
            "--type" | "-t" => {
                i += 1;
                if i < args.len() {
                    document.file_type = args[i].clone();
                }
            }
            "--title" => {
                i += 1;
                if i < args.len() {
                    document.title = args[i].clone();
                }
            }
            "--proxy" | "-p" => {
                i += 1;
                if i < args.len() {
                    proxy_url = args[i].clone();
                }
            }
            "--out" | "-o" => {
                i += 1;
                if i < args.len() {
                    out = Some(PathBuf::from(&args[i]));
                }
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let options = match ViewOptions::from_env() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let client = match ProxyClient::new(proxy_url) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let controller =
        DocumentViewController::new(client, ObjectUrlRegistry::new()).with_options(options);

    // Failures are reported through the rendered error body below.
    let _ = controller.open(document.clone()).await;

    match controller.render().body {
        ViewBody::InlineViewer { object_url, .. } | ViewBody::ExternalOnly { url: object_url } => {
            let Some(contents) = controller.registry().read(&object_url) else {
                eprintln!("Error: resource was released before it could be saved");
                std::process::exit(1);
            };

            let path = out.unwrap_or_else(|| {
                PathBuf::from(document.file_name().as_deref().unwrap_or("document.bin"))
            });
            if let Err(e) = tokio::fs::write(&path, &contents.bytes).await {
                eprintln!("Error: failed to write {}: {}", path.display(), e);
                std::process::exit(1);
            }

            println!(
                "Saved {} ({} bytes, {})",
                path.display(),
                contents.bytes.len(),
                contents.mime_type
            );
            controller.close();
        }
        ViewBody::Error {
            message,
            external_url,
            ..
        } => {
            eprintln!("Error loading document: {}", message);
            if let Some(url) = external_url {
                eprintln!("Open in a browser instead: {}", url);
            }
            std::process::exit(1);
        }
        ViewBody::Hidden | ViewBody::Loading => {
            eprintln!("Error: document view ended in an unexpected state");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!(
        r#"
Usage: fetch-document --url <FILE_URL> [OPTIONS]

Options:
  -u, --url <URL>      Source URL of the document (its last segment is the file name)
  -t, --type <MIME>    Declared MIME type (application/pdf renders inline)
      --title <TEXT>   Document title
  -p, --proxy <URL>    Proxy base URL (default: $DOCDESK_PROXY_URL or http://127.0.0.1:8080)
  -o, --out <PATH>     Output path (default: the file name)
  -h, --help           Show this help message

Environment:
  DOCDESK_VIEW_RETRY_ATTEMPTS     Attempts per load (default: 3)
  DOCDESK_VIEW_TIMEOUT_MS         Timeout per attempt (default: 10000)
  DOCDESK_VIEW_RETRY_BACKOFF_MS   Backoff step between attempts (default: 500)
"#
    );
}
