fn main() -> anyhow::Result<()> {
    o2rkit::cli::run_cli()
}
