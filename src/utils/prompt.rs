use std::io::{self, BufRead, Write};

/// Print `prompt` and read one line, trimmed. `None` at end of input.
pub fn read_answer<R, W>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<Option<String>>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{}", prompt)?;
    output.flush()?; // Make sure the prompt is immediately displayed

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Prompt on stdout and read a line from stdin. End of input reads as empty.
pub fn prompt_line(prompt: &str) -> io::Result<String> {
    let stdin = io::stdin();
    let answer = read_answer(&mut stdin.lock(), &mut io::stdout(), prompt)?;
    Ok(answer.unwrap_or_default())
}

pub fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    let stdin = io::stdin();
    confirm(&mut stdin.lock(), &mut io::stdout(), prompt, default)
}

fn confirm<R, W>(input: &mut R, output: &mut W, prompt: &str, default: Option<bool>) -> io::Result<bool>
where
    R: BufRead,
    W: Write,
{
    let question = match default {
        Some(true) => format!("{} (Y/n): ", prompt),
        Some(false) | None => format!("{} (y/N): ", prompt),
    };

    loop {
        let Some(answer) = read_answer(input, output, &question)? else {
            return Ok(default.unwrap_or(false));
        };

        match answer.to_uppercase().as_str() {
            "Y" => return Ok(true),
            "N" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}
