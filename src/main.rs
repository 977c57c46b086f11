fn main() -> Result<(), Box<dyn std::error::Error>> {
    lumina::cli::main()
}
