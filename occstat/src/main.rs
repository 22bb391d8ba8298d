fn main() -> anyhow::Result<()> {
    occstat::run()
}
