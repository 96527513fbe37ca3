use crate::GithubLanguageStats;
use derive_more::Constructor;
use lang_stats::api::{LanguageStat, Result};
use std::fmt::Display;

const SEPARATOR: &str = "----------------------------------------";

/// Fixed-width table of language statistics with a total bytes footer.
#[derive(Constructor)]
pub struct Report<'a> {
    stats: &'a [LanguageStat],
}

impl Display for Report<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\nLanguage Statistics:")?;
        writeln!(f, "{}", SEPARATOR)?;
        writeln!(f, "{:<20} {:>10} {:>10}", "LANGUAGE", "PERCENT", "BYTES")?;
        writeln!(f, "{}", SEPARATOR)?;
        for stat in self.stats {
            writeln!(f, "{:<20} {:>9.2}% {:>10}", stat.language, stat.percent, stat.bytes)?;
        }
        writeln!(f, "{}", SEPARATOR)?;
        let total_bytes: u128 = self.stats.iter().map(|stat| stat.bytes as u128).sum();
        writeln!(f, "{:<20} {:>10} {:>10}", "TOTAL", "", total_bytes)
    }
}

pub async fn print_report(calculator: &GithubLanguageStats, username: &str) -> Result<()> {
    println!("Fetching language stats for GitHub user: {}", username);
    let stats = calculator.language_stats(username).await?;
    print!("{}", Report::new(&stats));
    Ok(())
}

#[test]
fn report_test() {
    let stats = vec![
        LanguageStat::new("Go".to_string(), 70.0, 7000),
        LanguageStat::new("Python".to_string(), 20.0, 2000),
        LanguageStat::new("JavaScript".to_string(), 10.0, 1000),
    ];
    let expected = "
Language Statistics:
----------------------------------------
LANGUAGE                PERCENT      BYTES
----------------------------------------
Go                       70.00%       7000
Python                   20.00%       2000
JavaScript               10.00%       1000
----------------------------------------
TOTAL                                10000
";
    assert_eq!(Report::new(&stats).to_string(), expected);
}
