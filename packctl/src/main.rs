fn main() {
    if let Err(e) = packctl::run_cli() {
        eprintln!("{e:?}");
        std::process::exit(1);
    }
}
