use anyhow::Result;

pub fn execute() -> Result<()> {
    println!("chatline version {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
