fn main() -> Result<(), Box<dyn std::error::Error>> {
    musicflow::runtime::run()
}
