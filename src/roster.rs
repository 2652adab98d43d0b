//! Roster CSV codec.
//!
//! Reads candidate pools from comma-separated roster files and writes
//! finished assignments back out, one row per placed member.
//!
//! Input columns: `id,name,email,game,skill,role,score,type`. The first
//! line is a header and is skipped, as are blank lines. `game` becomes the
//! sub-category and `role` the functional tag. The `type` column must be
//! present but is not read; the category always comes from `score`.
//!
//! Fields are split on bare commas; quoting is not supported.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{Assignment, Candidate, Pool};

/// Header written by [`write_assignment`].
pub const ASSIGNMENT_HEADER: &str =
    "TeamID,MemberID,MemberName,PreferredGame,SkillLevel,PreferredRole,PersonalityType,PersonalityScore";

const MIN_FIELDS: usize = 8;

/// Errors from reading or writing roster files.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Every data row was blank or invalid.
    #[error("no valid candidates found")]
    NoValidRecords,

    /// The assignment holds no groups.
    #[error("no groups to save")]
    NothingToSave,

    /// A single row failed validation. Skipped rows are logged, not returned.
    #[error("line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },
}

/// Loads a pool from a roster file.
pub fn load_candidates(path: impl AsRef<Path>) -> Result<Pool, RosterError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let pool = parse_candidates(BufReader::new(file))?;
    debug!(path = %path.display(), candidates = pool.len(), "loaded roster");
    Ok(pool)
}

/// Parses a pool from roster CSV text.
///
/// Invalid rows are skipped with a warning. Returns
/// [`RosterError::NoValidRecords`] if nothing survives.
///
/// # Examples
///
/// ```
/// use u_teamform::roster::parse_candidates;
///
/// let csv = "id,name,email,game,skill,role,score,type\n\
///            P1,Ann,ann@x.io,Chess,7,Strategist,92,Leader\n\
///            P2,Bob,bob@x.io,FIFA,11,Defender,80,Balanced\n";
/// let pool = parse_candidates(csv.as_bytes()).unwrap();
/// assert_eq!(pool.len(), 1);
/// ```
pub fn parse_candidates<R: BufRead>(reader: R) -> Result<Pool, RosterError> {
    let mut candidates = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        // header
        if index == 0 || line.trim().is_empty() {
            continue;
        }
        match parse_record(index + 1, &line) {
            Ok(candidate) => candidates.push(candidate),
            Err(err) => warn!(%err, "skipping invalid roster row"),
        }
    }

    if candidates.is_empty() {
        return Err(RosterError::NoValidRecords);
    }
    Ok(Pool::new(candidates))
}

fn parse_record(line: usize, text: &str) -> Result<Candidate, RosterError> {
    let invalid = |reason: String| RosterError::InvalidRecord { line, reason };

    let fields: Vec<&str> = text.split(',').map(str::trim).collect();
    if fields.len() < MIN_FIELDS {
        return Err(invalid(format!(
            "expected at least {MIN_FIELDS} fields, found {}",
            fields.len()
        )));
    }

    let (id, name, email, game, role) = (fields[0], fields[1], fields[2], fields[3], fields[5]);
    if id.is_empty() || name.is_empty() || email.is_empty() {
        return Err(invalid("missing id, name, or email".into()));
    }

    let skill: u32 = fields[4]
        .parse()
        .map_err(|_| invalid(format!("invalid skill level '{}'", fields[4])))?;
    if !(1..=10).contains(&skill) {
        return Err(invalid(format!("skill level {skill} outside 1..=10")));
    }

    let score: u32 = fields[6]
        .parse()
        .map_err(|_| invalid(format!("invalid score '{}'", fields[6])))?;
    if score > 100 {
        return Err(invalid(format!("score {score} outside 0..=100")));
    }

    Ok(Candidate::new(id, name, skill, score, game, role))
}

/// Saves `assignment` to a roster file, replacing any existing file.
pub fn save_assignment(
    path: impl AsRef<Path>,
    pool: &Pool,
    assignment: &Assignment,
) -> Result<(), RosterError> {
    let path = path.as_ref();
    // check before creating the file so a failed save leaves nothing behind
    if assignment.is_empty() {
        return Err(RosterError::NothingToSave);
    }
    let mut writer = BufWriter::new(File::create(path)?);
    write_assignment(&mut writer, pool, assignment)?;
    writer.flush()?;
    debug!(path = %path.display(), groups = assignment.group_count(), "saved assignment");
    Ok(())
}

/// Writes one row per placed member, groups in order.
pub fn write_assignment<W: Write>(
    mut writer: W,
    pool: &Pool,
    assignment: &Assignment,
) -> Result<(), RosterError> {
    if assignment.is_empty() {
        return Err(RosterError::NothingToSave);
    }

    writeln!(writer, "{ASSIGNMENT_HEADER}")?;
    for group in assignment.groups() {
        for &member in group.members() {
            let c = &pool[member];
            writeln!(
                writer,
                "{},{},{},{},{},{},{},{}",
                group.label(),
                c.id(),
                c.name(),
                c.sub_category(),
                c.skill(),
                c.functional_tag(),
                c.category(),
                c.score()
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CandidateId, Category, Group};

    const ROSTER: &str = "\
id,name,email,game,skill,role,score,type
P001,Ann,ann@uni.edu,Chess,7,Strategist,92,Leader
P002,Bob,bob@uni.edu,FIFA,5,Attacker,75,Balanced

P003,Cid,cid@uni.edu,Valorant,3,Defender,55,Thinker
P004,,dee@uni.edu,DOTA,6,Supporter,80,Balanced
P005,Eve,eve@uni.edu,CS:GO,0,Coordinator,80,Balanced
P006,Fay,fay@uni.edu,Basketball,9,Supporter,101,Leader
P007,Gus,gus@uni.edu,Chess
P008,Hal,hal@uni.edu,Chess,ten,Strategist,80,Balanced
P009,Ivy,ivy@uni.edu,Chess,8,Strategist,40,Thinker
P010,Jon,,FIFA,4,Attacker,80,Balanced
P011,Kim,kim@uni.edu,DOTA,6,Defender,80
";

    #[test]
    fn test_parse_skips_invalid_rows() {
        let pool = parse_candidates(ROSTER.as_bytes()).unwrap();
        let ids: Vec<&str> = pool.candidates().iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["P001", "P002", "P003", "P009"]);
    }

    #[test]
    fn test_parse_fields() {
        let pool = parse_candidates(ROSTER.as_bytes()).unwrap();
        let ann = &pool[CandidateId(0)];
        assert_eq!(ann.name(), "Ann");
        assert_eq!(ann.sub_category(), "Chess");
        assert_eq!(ann.functional_tag(), "Strategist");
        assert_eq!(ann.skill(), 7);
        assert_eq!(ann.score(), 92);
        assert_eq!(ann.category(), Category::Primary);

        assert_eq!(pool[CandidateId(1)].category(), Category::Mixed);
        assert_eq!(pool[CandidateId(2)].category(), Category::Secondary);
    }

    #[test]
    fn test_category_comes_from_score_not_type_column() {
        let pool = parse_candidates(ROSTER.as_bytes()).unwrap();
        let ivy = &pool[CandidateId(3)];
        assert_eq!(ivy.score(), 40);
        assert_eq!(ivy.category(), Category::Unclassified);

        let row = parse_record(2, "P1,Ann,a@x,Chess,7,Role,95,Thinker").unwrap();
        assert_eq!(row.category(), Category::Primary);
    }

    #[test]
    fn test_parse_record_reasons() {
        let err = parse_record(4, "P1,Ann,a@x,Chess,7").unwrap_err();
        assert!(matches!(err, RosterError::InvalidRecord { line: 4, .. }));
        assert!(err.to_string().starts_with("line 4:"));

        let err = parse_record(2, "P1,Ann,a@x,Chess,7,Role,-3,Leader").unwrap_err();
        assert!(err.to_string().contains("invalid score"));

        // all seven value columns present, type column missing
        let err = parse_record(3, "P1,Ann,a@x,Chess,7,Role,80").unwrap_err();
        assert!(err.to_string().contains("expected at least 8 fields"));

        let err = parse_record(5, "P1,Ann,,Chess,7,Role,80,Balanced").unwrap_err();
        assert!(err.to_string().contains("missing id, name, or email"));
    }

    #[test]
    fn test_no_valid_records() {
        let csv = "id,name,email,game,skill,role,score,type\nP1,,x,y,5,z,80,Balanced\n";
        assert!(matches!(
            parse_candidates(csv.as_bytes()),
            Err(RosterError::NoValidRecords)
        ));
        assert!(matches!(
            parse_candidates("".as_bytes()),
            Err(RosterError::NoValidRecords)
        ));
    }

    fn sample() -> (Pool, Assignment) {
        let pool: Pool = vec![
            Candidate::new("P1", "Ann", 7, 92, "Chess", "Strategist"),
            Candidate::new("P2", "Bob", 5, 60, "FIFA", "Attacker"),
            Candidate::new("P3", "Cid", 4, 75, "DOTA", "Defender"),
        ]
        .into();
        let mut group = Group::new("Group-1", 2);
        group.insert(CandidateId(0), &pool);
        group.insert(CandidateId(2), &pool);
        (pool, Assignment::from_groups(vec![group], 2))
    }

    #[test]
    fn test_write_assignment() {
        let (pool, assignment) = sample();
        let mut out = Vec::new();
        write_assignment(&mut out, &pool, &assignment).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], ASSIGNMENT_HEADER);
        assert_eq!(lines[1], "Group-1,P1,Ann,Chess,7,Strategist,Primary,92");
        assert_eq!(lines[2], "Group-1,P3,Cid,DOTA,4,Defender,Mixed,75");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_write_empty_assignment_fails() {
        let (pool, _) = sample();
        let empty = Assignment::from_groups(Vec::new(), 2);
        assert!(matches!(
            write_assignment(Vec::new(), &pool, &empty),
            Err(RosterError::NothingToSave)
        ));
    }

    #[test]
    fn test_save_and_load_files() {
        let dir = tempfile::tempdir().unwrap();
        let roster = dir.path().join("roster.csv");
        std::fs::write(&roster, ROSTER).unwrap();
        let pool = load_candidates(&roster).unwrap();
        assert_eq!(pool.len(), 4);

        let (pool, assignment) = sample();
        let out = dir.path().join("teams.csv");
        save_assignment(&out, &pool, &assignment).unwrap();
        let saved = std::fs::read_to_string(&out).unwrap();
        assert_eq!(saved.lines().count(), 3);

        let missing = dir.path().join("missing.csv");
        assert!(matches!(load_candidates(&missing), Err(RosterError::Io(_))));
    }
}
