fn main() {
    if let Err(err) = xlsxtocsv::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
