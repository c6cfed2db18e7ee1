use std::io::{self, BufRead, Write};

/// Ask for a credential name on the terminal. The answer is returned
/// trimmed.
pub fn ask_name<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<String> {
    writeln!(output, "Input the name of the new KeyCredential")?;
    write!(output, "Name: ")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Keep a console window opened by double-click visible until the user has
/// read the result.
pub fn wait_for_enter<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<()> {
    writeln!(output, "Hit Enter key to terminate...")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_ask_name_trims_line_ending() {
        let mut input = Cursor::new(b"svc-key\r\n".to_vec());
        let mut output = Vec::new();
        let name = ask_name(&mut input, &mut output).unwrap();
        assert_eq!(name, "svc-key");
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.ends_with("Name: "));
    }

    #[test]
    fn test_wait_for_enter_accepts_eof() {
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        wait_for_enter(&mut input, &mut output).unwrap();
        assert_eq!(output, b"Hit Enter key to terminate...\n");
    }
}
