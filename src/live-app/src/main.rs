fn main() -> anyhow::Result<()> {
    liveapp_cli::main()
}
