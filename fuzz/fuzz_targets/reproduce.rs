use std::time::Instant;

use log::info;
use urlfind::find_urls;

fn main() {
    env_logger::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: reproduce <artifact-file-or-text>");
        std::process::exit(1);
    });

    let data = std::fs::read(&path).unwrap_or_else(|e| {
        eprintln!("Failed to read {path}: {e}");
        std::process::exit(1);
    });

    let text = match std::str::from_utf8(&data) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Input is not valid UTF-8: {e}");
            std::process::exit(1);
        }
    };

    let iterations = std::env::var("ITERATIONS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1);

    eprintln!("=== Input: {} ({} bytes), {} iteration(s) ===", path, text.len(), iterations);

    for i in 0..iterations {
        let iter_start = Instant::now();
        let urls = find_urls(text);

        if i == 0 {
            for m in &urls {
                println!("{}..{}\t{}", m.start(), m.end(), m);
            }
        }

        info!(
            "iteration {}: {} match(es) in {:.1}ms",
            i,
            urls.len(),
            iter_start.elapsed().as_secs_f64() * 1000.0
        );
    }
}
