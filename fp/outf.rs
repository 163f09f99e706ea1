static OUTF: std::sync::Mutex<Option<std::io::BufWriter<std::fs::File>>> =
    std::sync::Mutex::new(None);

/// Send output to `path`, truncating it, or to stdout when `None`.
pub fn init(path: &Option<std::path::PathBuf>) -> Result<(), std::io::Error> {
    static CALLED: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);
    if CALLED.swap(true, std::sync::atomic::Ordering::SeqCst) {
        return Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            "outf::init() called more than once",
        ));
    }
    if let Some(path) = path {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        if let Ok(mut outf) = OUTF.lock() {
            *outf = Some(std::io::BufWriter::new(file));
        }
    }
    Ok(())
}

pub fn try_write_line(s: &str) -> Result<(), std::io::Error> {
    use std::io::Write;
    match OUTF.lock() {
        Ok(mut outf) => match outf.as_mut() {
            Some(file) => writeln!(file, "{s}"),
            None => {
                println!("{s}");
                Ok(())
            }
        },
        Err(_) => Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            "Failed to lock output file",
        )),
    }
}

pub fn write_line(s: &str) {
    if let Err(e) = try_write_line(s) {
        log::error!("{e:?}");
        println!("{s}");
    }
}

pub fn flush() {
    use std::io::Write;
    match OUTF.lock() {
        Ok(mut outf) => {
            if let Some(Err(e)) = outf.as_mut().map(|f| f.flush()) {
                log::error!("{e:?}");
            }
        }
        Err(_) => log::error!("Lock failed, cannot flush output file"),
    }
}

// A `println!`-compatible macro that
// - Writes to the output file given to `init()`
// - Writes to stdout, if no output file was given
// - Writes to stdout and `log::error!`s if writing to the output file fails
#[macro_export]
macro_rules! outfprintln {
    ($($arg:tt)*) => {
        $crate::outf::write_line(&format!($($arg)*))
    }
}

pub use outfprintln;
