use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

#[derive(Clone, Copy, Debug)]
pub enum JsonLogFormat {
    Pretty,
    Compact,
}

/// Stream that receives log records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogStream {
    Stdout,
    /// Used when stdout is reserved for machine-readable output.
    Stderr,
}

impl LogStream {
    fn open(self) -> Box<dyn std::io::Write> {
        match self {
            LogStream::Stdout => Box::new(std::io::stdout()),
            LogStream::Stderr => Box::new(std::io::stderr()),
        }
    }
}

/// Initializes the tracing subscriber on `stream`.
///
/// `RUST_LOG` takes precedence over the `verbose` default. With `log_json`
/// every event is a JSON record, optionally pretty-printed.
pub fn init(verbose: bool, log_json: bool, json_format: JsonLogFormat, stream: LogStream) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_env_filter(verbose));
    let writer = move || stream.open();

    // Box<dyn Layer> erases the differing formatter types
    let layer: Box<dyn Layer<Registry> + Send + Sync> = if log_json {
        match json_format {
            JsonLogFormat::Pretty => Box::new(
                fmt::layer()
                    .json()
                    .with_writer(move || PrettyJsonWriter::new(stream.open()))
                    .with_filter(filter),
            ),
            JsonLogFormat::Compact => Box::new(
                fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_filter(filter),
            ),
        }
    } else if verbose {
        Box::new(fmt::layer().with_writer(writer).with_filter(filter))
    } else {
        Box::new(
            fmt::layer()
                .with_writer(writer)
                .without_time()
                .with_target(false)
                .with_level(true)
                .with_filter(filter),
        )
    };

    tracing_subscriber::registry().with(layer).init();
}

struct PrettyJsonWriter<W: std::io::Write> {
    inner: W,
}

impl<W: std::io::Write> PrettyJsonWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: std::io::Write> std::io::Write for PrettyJsonWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        // The JSON formatter emits one record per write.
        if let Ok(s) = std::str::from_utf8(buf) {
            let trimmed = s.trim();
            if trimmed.starts_with('{')
                && trimmed.ends_with('}')
                && let Ok(val) = serde_json::from_str::<serde_json::Value>(trimmed)
                && serde_json::to_writer_pretty(&mut self.inner, &val).is_ok()
            {
                self.inner.write_all(b"\n")?;
                return Ok(buf.len());
            }
        }
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

fn default_env_filter(verbose: bool) -> EnvFilter {
    let spec = if verbose {
        "snippet_extract=debug,info"
    } else {
        "snippet_extract=info,warn"
    };
    EnvFilter::new(spec)
}
