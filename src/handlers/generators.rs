//! Handler for the `generators` command.

use crate::analyzer::all_generators;
use colored::Colorize;

/// Render the generator catalog.
pub fn format_generators() -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", "Registered metric generators".bold()));

    for generator in all_generators() {
        output.push_str(&format!("\n  {}\n", generator.name().cyan().bold()));
        for ty in generator.supported_types() {
            output.push_str(&format!("    - {}\n", ty));
        }
    }

    output
}

/// Handle the generators command.
pub fn handle_generators() {
    print!("{}", format_generators());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_every_type() {
        colored::control::set_override(false);
        let text = format_generators();
        assert!(text.contains("lambda"));
        assert!(text.contains("    - AWS::Serverless::Function"));
        assert!(text.contains("    - AWS::SQS::Queue"));
    }
}
