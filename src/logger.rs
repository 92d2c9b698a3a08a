use std::error::Error;

#[cfg(feature = "logger")]
pub fn init() -> Result<(), Box<dyn Error>> {
    use std::fs::File;

    let log_file = File::options().create(true).append(true).open("app.log")?;

    structured_logger::Builder::new()
        .with_default_writer(structured_logger::json::new_writer(log_file))
        .init();

    Ok(())
}

#[cfg(not(feature = "logger"))]
pub fn init() -> Result<(), Box<dyn Error>> {
    Ok(())
}
