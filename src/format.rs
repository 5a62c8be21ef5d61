use anyhow::Result;
use clap::ValueEnum;
use ebnf::{Grammar, NonTerminalId, Production, Symbol};

/// Output formats for a normalized grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// One `lhs ::= sym sym ...` line per production.
    Bnf,
    /// An array of `[lhs, [sym, ...]]` pairs.
    Json,
    /// Like bnf, with each terminal character replaced by its code point.
    Numeric,
}

/// Render `grammar` in the given format. With `translate`, non-terminals are
/// written as `<name>` instead of their integer id.
pub fn render(grammar: &Grammar, format: Format, translate: bool) -> Result<String> {
    match format {
        Format::Bnf => Ok(render_bnf(grammar, translate)),
        Format::Json => render_json(grammar, translate),
        Format::Numeric => Ok(render_numeric(grammar, translate)),
    }
}

fn non_terminal(grammar: &Grammar, id: NonTerminalId, translate: bool) -> String {
    if translate {
        grammar.symbol_name(&Symbol::NonTerminal(id))
    } else {
        id.to_string()
    }
}

fn render_bnf(grammar: &Grammar, translate: bool) -> String {
    if translate {
        return grammar.to_string();
    }
    grammar
        .rules
        .iter()
        .map(|rule| format!("{}\n", rule))
        .collect()
}

fn render_json(grammar: &Grammar, translate: bool) -> Result<String> {
    let mut out = if translate {
        let rules: Vec<(String, Vec<String>)> = grammar
            .rules
            .iter()
            .map(|rule| {
                let lhs = non_terminal(grammar, rule.lhs, true);
                let rhs = rule.rhs.iter().map(|sym| grammar.symbol_name(sym)).collect();
                (lhs, rhs)
            })
            .collect();
        serde_json::to_string_pretty(&rules)?
    } else {
        let rules: Vec<(NonTerminalId, &Vec<Symbol>)> = grammar
            .rules
            .iter()
            .map(|rule| (rule.lhs, &rule.rhs))
            .collect();
        serde_json::to_string_pretty(&rules)?
    };
    out.push('\n');
    Ok(out)
}

fn render_numeric(grammar: &Grammar, translate: bool) -> String {
    grammar
        .rules
        .iter()
        .map(|rule| format!("{}\n", numeric_line(grammar, rule, translate)))
        .collect()
}

fn numeric_line(grammar: &Grammar, rule: &Production, translate: bool) -> String {
    let mut parts = vec![non_terminal(grammar, rule.lhs, translate), "::=".to_owned()];
    for sym in &rule.rhs {
        match sym {
            Symbol::NonTerminal(id) => parts.push(non_terminal(grammar, *id, translate)),
            // Epsilon has no characters and contributes nothing.
            Symbol::Terminal(text) => parts.extend(text.chars().map(|c| (c as u32).to_string())),
        }
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_skips_epsilon() {
        let g = ebnf::parse("<s> ::= 'ab' | ''", true).unwrap();
        assert_eq!(
            render(&g, Format::Numeric, false).unwrap(),
            "-1 ::= 97 98\n-1 ::=\n"
        );
    }

    #[test]
    fn numeric_with_names() {
        let g = ebnf::parse("<s> ::= %x41 <t>", false).unwrap();
        assert_eq!(
            render(&g, Format::Numeric, true).unwrap(),
            "<s> ::= 65 <t>\n"
        );
    }
}
