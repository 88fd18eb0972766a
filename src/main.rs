fn main() {
    if let Err(err) = disaster_etl::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
