use gifti::{DecodeError, Encoding, Endian, GiftiWriterBuilder};
use std::error;
use std::io::{self, BufWriter, Read, Write};

fn main() -> Result<(), Box<dyn error::Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let mut builder = GiftiWriterBuilder::new();
    if let Some(raw) = args.get(1) {
        builder.encoding(gifti::normalize::<Encoding>(raw).map_err(DecodeError::from)?);
    }
    if let Some(raw) = args.get(2) {
        builder.endian(gifti::normalize::<Endian>(raw).map_err(DecodeError::from)?);
    }

    let mut data = Vec::new();
    io::stdin().read_to_end(&mut data)?;
    let doc = gifti::from_slice(&data)?;

    let stdout = io::stdout();
    let mut writer = builder.from_writer(BufWriter::new(stdout.lock()));
    writer.write_document(&doc)?;
    writer.inner().flush()?;

    log::debug!("converted {} data arrays", doc.number_of_data_arrays());
    Ok(())
}
