use colored::*;

pub struct FeedbackAnalyzer;

impl FeedbackAnalyzer {
    pub fn analyze(output: &str) -> Option<String> {
        // 1. Executable has no entry point
        if output.contains("undefined reference to `main'")
            || output.contains("entry point must be defined")
        {
            return Some(format!(
                "Your executable is missing a {} function.\nCheck that the file defining it is listed in the executable's {} line in {}.",
                "main()".bold().yellow(),
                "files =".bold().green(),
                "diddy".bold().yellow()
            ));
        }

        // 2. Symbol defined in a file that was never compiled
        if output.contains("undefined reference to") || output.contains("Undefined symbols") {
            return Some(format!(
                "It looks like a {} error.\nA source file may be missing from a {} or {} section in {}.",
                "Linker".bold().red(),
                "[library]".bold().yellow(),
                "[executable]".bold().yellow(),
                "diddy".bold().yellow()
            ));
        }

        // 3. Missing header
        if output.contains("fatal error: ") && output.contains("No such file or directory") {
            return Some(format!(
                "It looks like a {} error.\nIncludes are resolved relative to the source file and the current directory.",
                "Missing Header".bold().red()
            ));
        }

        None
    }
}
