use std::error;
use std::io::{self, Read};

fn main() -> Result<(), Box<dyn error::Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let doc = match args.get(1) {
        Some(path) => gifti::read(path)?,
        None => {
            let mut data = Vec::new();
            io::stdin().read_to_end(&mut data)?;
            gifti::from_slice(&data)?
        }
    };

    print!("{}", doc);
    for (i, array) in doc.arrays().iter().enumerate() {
        for (name, value) in array.metadata().iter() {
            println!("  [{}] {}: {}", i, name, value);
        }
    }

    Ok(())
}
