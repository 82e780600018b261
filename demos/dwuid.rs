//! Simple command that prints one or '-n count' identifiers of a chosen kind and encoding

use std::{env, io, io::Write, process::ExitCode};

use dwuid::{Encoding, RandomUidGenerator, TimestampUidGenerator, UidGenerator, UidValue};

#[derive(Debug, Default)]
struct Options {
    count: Option<usize>,
    random: Option<bool>,
    encoding: Option<Encoding>,
}

fn main() -> io::Result<ExitCode> {
    let opts = {
        let mut args = env::args();
        let program = args.next();
        match parse_args(args) {
            Ok(opts) => opts,
            Err(message) => {
                eprintln!("Error: {}", message);
                eprintln!(
                    "Usage: {} [-n count] [-k timestamp|random] [-e base58|base64]",
                    program.as_deref().unwrap_or("dwuid")
                );
                return Ok(ExitCode::FAILURE);
            }
        }
    };

    let count = opts.count.unwrap_or(1);
    let encoding = opts.encoding.unwrap_or_default();
    let mut buf = io::BufWriter::new(io::stdout());
    if opts.random.unwrap_or(false) {
        write_uids(&mut buf, RandomUidGenerator::default(), count, encoding)?;
    } else {
        write_uids(&mut buf, TimestampUidGenerator::default(), count, encoding)?;
    }

    Ok(ExitCode::SUCCESS)
}

fn write_uids<G>(buf: &mut impl Write, mut g: G, count: usize, encoding: Encoding) -> io::Result<()>
where
    G: UidGenerator,
    G::Output: UidValue,
{
    for _ in 0..count {
        writeln!(buf, "{}", g.generate().encode(encoding))?;
    }
    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut opts = Options::default();
    while let Some(arg) = args.next() {
        let name = match arg.as_str() {
            "-n" => 'n',
            "-k" => 'k',
            "-e" => 'e',
            _ => return Err(format!("unrecognized argument '{}'", arg)),
        };
        let Some(value) = args.next() else {
            return Err(format!("argument to option '{}' missing", name));
        };
        let given = match name {
            'n' => {
                let Ok(c) = value.parse() else {
                    return Err(format!("invalid argument to option 'n': '{}'", value));
                };
                opts.count.replace(c).is_some()
            }
            'k' => {
                let random = match value.as_str() {
                    "timestamp" => false,
                    "random" => true,
                    _ => return Err(format!("invalid argument to option 'k': '{}'", value)),
                };
                opts.random.replace(random).is_some()
            }
            _ => {
                let Ok(e) = value.parse() else {
                    return Err(format!("invalid argument to option 'e': '{}'", value));
                };
                opts.encoding.replace(e).is_some()
            }
        };
        if given {
            return Err(format!("option '{}' given more than once", name));
        }
    }
    Ok(opts)
}
