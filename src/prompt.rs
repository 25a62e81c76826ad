use std::io::{self, BufRead, Write};

/// Print `label` and read one trimmed line
///
/// Returns `None` once the input is exhausted.
pub fn read_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> io::Result<Option<String>> {
    write!(output, "{}", label)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Ask for the API key; an empty answer counts as no key
pub fn read_api_key<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> io::Result<Option<String>> {
    writeln!(output, "\n--- ENTER CREDENTIALS ---")?;
    writeln!(output, "Please paste your NVIDIA API Key (starts with nvapi-...)")?;
    let key = read_line(input, output, "API Key > ")?;
    Ok(key.filter(|key| !key.is_empty()))
}
