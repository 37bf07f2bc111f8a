use console::style;
use std::fmt::Display;
use std::io::Write;

const LOGO: &str = r"
░█░█░▀█▀░█▀▄░█▀█░█░█░█▀█░█░░░█▀█░█▀█░█▀▄░█▀▀░█▀▄
░░█░░░█░░█░█░█░█░█▄█░█░█░█░░░█░█░█▀█░█░█░█▀▀░█▀▄
░░▀░░░▀░░▀▀░░▀▀▀░▀░▀░▀░▀░▀▀▀░▀▀▀░▀░▀░▀▀░░▀▀▀░▀░▀
";

// status lines are best effort, a closed terminal is not worth failing over
fn emit<W: Write>(out: &mut W, line: impl Display) {
    let _ = writeln!(out, "{}", line);
    let _ = out.flush();
}

/// `[ERROR] message`, meant for stderr.
pub fn error<W: Write>(out: &mut W, message: impl Display) {
    let tag = style("[ERROR] ").red().bold().for_stderr();
    emit(out, format_args!("{}{}", tag, message));
}

/// `[WARNING] message`, meant for stderr.
pub fn warning<W: Write>(out: &mut W, message: impl Display) {
    let tag = style("[WARNING] ").magenta().bold().for_stderr();
    emit(out, format_args!("{}{}", tag, message));
}

pub fn success<W: Write>(out: &mut W, message: impl Display) {
    let tag = style("[SUCCESS] ").green().bold();
    emit(out, format_args!("{}{}", tag, message));
}

pub fn red<W: Write>(out: &mut W, message: impl Display) {
    emit(out, style(message).red().bold());
}

pub fn green<W: Write>(out: &mut W, message: impl Display) {
    emit(out, style(message).green().bold());
}

pub fn logo<W: Write>(out: &mut W) {
    green(out, LOGO);
}
