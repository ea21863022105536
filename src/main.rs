use std::path::{Path, PathBuf};
use std::process::ExitCode;

use argh::FromArgs;
use grob::{ColorTable, GrobError, Limits, ProgramOptions, output, program};

#[derive(FromArgs)]
/// Convert a BMP image or binary file into HP Prime PPL code.
struct Args {
    /// input BMP or binary file
    #[argh(positional)]
    input: Option<PathBuf>,

    /// output file; ".hpprgm" is appended when it has no extension
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// variable name for non-image data (default: input file stem)
    #[argh(option, short = 'n')]
    name: Option<String>,

    /// graphic object 1-9 to use if the file is an image
    #[argh(option, short = 'g', default = "1")]
    grob: u8,

    /// wrap the PPL code between #PPL and #END
    #[argh(switch, short = 'p')]
    pplus: bool,

    /// tokens per line (default: one pixel row for images, 8 otherwise)
    #[argh(option, short = 'c')]
    columns: Option<usize>,

    /// replace the palette of an indexed image with an Adobe color table
    #[argh(option)]
    palette: Option<PathBuf>,

    /// refuse images with more pixels than this
    #[argh(option)]
    max_pixels: Option<u64>,

    /// print version information
    #[argh(switch)]
    version: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();
    if args.version {
        println!("grob {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let Some(input) = args.input.as_deref() else {
        eprintln!("grob: no input file, try 'grob --help' for more information");
        return ExitCode::from(1);
    };

    match run(input, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("grob: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(input: &Path, args: &Args) -> Result<(), GrobError> {
    let data = match std::fs::read(input) {
        Ok(data) if !data.is_empty() => data,
        _ => return Err(GrobError::FileNotFound(input.to_path_buf())),
    };
    log::debug!("read {} bytes from {}", data.len(), input.display());

    let mut limits = Limits::default();
    if let Some(max) = args.max_pixels {
        limits = limits.with_max_pixels(max);
    }
    let mut bitmap = grob::load_with_limits(data, &limits)?;
    if let Some(path) = &args.palette {
        if bitmap.is_indexed() {
            bitmap.set_palette(ColorTable::load_from_file(path)?);
        } else {
            log::warn!("ignoring --palette, input is not an indexed image");
        }
    }

    let mut options = ProgramOptions::default()
        .with_name(args.name.clone().unwrap_or_else(|| file_stem(input)))
        .with_grob(args.grob)
        .with_pplus(args.pplus);
    if let Some(columns) = args.columns {
        options = options.with_columns(columns);
    }

    let text = program::emit(&bitmap, &options)?;
    output::save(&output_path(input, args.output.as_deref()), &text)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "data".into())
}

/// `-o` as given (plus extension when missing), or the input stem in the
/// current directory.
fn output_path(input: &Path, requested: Option<&Path>) -> PathBuf {
    match requested {
        Some(path) if path.extension().is_some() => path.to_path_buf(),
        Some(path) => path.with_extension(output::PROGRAM_EXTENSION),
        None => PathBuf::from(file_stem(input)).with_extension(output::PROGRAM_EXTENSION),
    }
}
