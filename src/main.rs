fn main() {
    if let Err(e) = bch_balance_pipeline::cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
