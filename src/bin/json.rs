use std::error;
use std::io::{self, Read};

fn main() -> Result<(), Box<dyn error::Error>> {
    env_logger::init();

    let mut data = Vec::new();
    io::stdin().read_to_end(&mut data)?;
    let doc = gifti::from_slice(&data)?;

    let stdout = io::stdout();
    let lock = stdout.lock();
    serde_json::to_writer_pretty(lock, &doc)?;
    println!();
    Ok(())
}
