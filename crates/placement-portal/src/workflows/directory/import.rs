use std::io::Read;

use serde::Deserialize;

use super::domain::{Branch, NewStudent};

/// Roster parsing failure.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("malformed roster: {0}")]
    Csv(#[from] csv::Error),
    #[error("roster line {line}: unknown branch '{value}'")]
    UnknownBranch { line: u64, value: String },
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    name: String,
    email: String,
    branch: String,
    cgpa: f64,
    #[serde(default)]
    semester: Option<u8>,
    #[serde(default)]
    backlogs: Option<u32>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    tenth_percentage: Option<f64>,
    #[serde(default)]
    twelfth_percentage: Option<f64>,
    #[serde(default)]
    skills: Option<String>,
}

/// Parse a headed CSV roster (`name,email,branch,cgpa,...`) into student drafts.
/// Skills are `;`-separated within their column.
pub fn read_roster<R: Read>(reader: R) -> Result<Vec<NewStudent>, RosterError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut drafts = Vec::new();
    for (index, row) in csv_reader.deserialize::<RosterRow>().enumerate() {
        let row = row?;
        // header occupies line 1
        let line = index as u64 + 2;
        let branch = Branch::from_code(&row.branch).ok_or_else(|| RosterError::UnknownBranch {
            line,
            value: row.branch.clone(),
        })?;
        let skills = row
            .skills
            .map(|raw| {
                raw.split(';')
                    .map(str::trim)
                    .filter(|skill| !skill.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        drafts.push(NewStudent {
            name: row.name,
            email: row.email,
            branch,
            cgpa: row.cgpa,
            semester: row.semester,
            backlogs: row.backlogs.unwrap_or(0),
            phone: row.phone.filter(|phone| !phone.is_empty()),
            resume_link: None,
            skills,
            certifications: Vec::new(),
            tenth_percentage: row.tenth_percentage,
            twelfth_percentage: row.twelfth_percentage,
            status: None,
        });
    }

    Ok(drafts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_with_optional_columns() {
        let csv = "name,email,branch,cgpa,semester,backlogs,phone,tenth_percentage,twelfth_percentage,skills\n\
                   Asha Rao,asha@college.edu,cse,8.4,7,0,,92.5,,rust; sql\n\
                   Vikram Das,vikram@college.edu,MECH,6.1,,2,98450,,,\n";

        let drafts = read_roster(csv.as_bytes()).expect("roster parses");

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].branch, Branch::Cse);
        assert_eq!(drafts[0].skills, vec!["rust".to_string(), "sql".to_string()]);
        assert_eq!(drafts[0].phone, None);
        assert_eq!(drafts[1].backlogs, 2);
        assert_eq!(drafts[1].semester, None);
        assert!(drafts[1].skills.is_empty());
    }

    #[test]
    fn unknown_branch_reports_line() {
        let csv = "name,email,branch,cgpa\nAsha Rao,asha@college.edu,CSE,8.4\nRavi,ravi@college.edu,AERO,7.0\n";

        match read_roster(csv.as_bytes()) {
            Err(RosterError::UnknownBranch { line, value }) => {
                assert_eq!(line, 3);
                assert_eq!(value, "AERO");
            }
            other => panic!("expected unknown branch, got {other:?}"),
        }
    }
}
