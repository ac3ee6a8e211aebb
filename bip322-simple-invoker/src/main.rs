use anyhow::Result;

fn main() -> Result<()> {
    bip322_simple_invoker::run()
}
