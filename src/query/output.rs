use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::DATE_FORMAT;
use crate::query::ast::QueryOutput;

pub const OUTPUT_SEPARATOR: char = ';';

/// Destination for the formatted output of numbered commands
pub trait OutputSink {
    /// `command` is the 1-based position of the query in its batch.
    fn write_output(&mut self, command: usize, lines: &[String]) -> Result<()>;
}

/// `<dir>/command<N>_output.txt`
pub fn command_output_path(dir: &Path, command: usize) -> PathBuf {
    dir.join(format!("command{}_output.txt", command))
}

/// Writes one file per command
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| Error::new(ErrorKind::Io, format!("Cannot create {}: {}", dir.display(), e)))?;
        Ok(FileSink { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl OutputSink for FileSink {
    fn write_output(&mut self, command: usize, lines: &[String]) -> Result<()> {
        let path = command_output_path(&self.dir, command);
        let mut writer = BufWriter::new(File::create(&path)?);
        for line in lines {
            writeln!(writer, "{}", line)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Keeps outputs in memory, in arrival order
#[derive(Debug, Default)]
pub struct BufferSink {
    pub outputs: Vec<(usize, Vec<String>)>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self, command: usize) -> Option<&[String]> {
        self.outputs.iter()
            .find(|(n, _)| *n == command)
            .map(|(_, lines)| lines.as_slice())
    }
}

impl OutputSink for BufferSink {
    fn write_output(&mut self, command: usize, lines: &[String]) -> Result<()> {
        self.outputs.push((command, lines.to_vec()));
        Ok(())
    }
}

/// Renders a query output as the lines of its command file.
pub fn format_output(output: &QueryOutput) -> Vec<String> {
    let sep = OUTPUT_SEPARATOR;
    match output {
        QueryOutput::Profile(None) => Vec::new(),
        QueryOutput::Profile(Some(p)) => vec![format!(
            "{}{sep}{}{sep}{}{sep}{:.3}{sep}{}{sep}{:.3}",
            p.name, p.gender.as_str(), p.age, p.average_score, p.ride_count, p.total_amount
        )],
        QueryOutput::Drivers(drivers) => drivers.iter()
            .map(|d| format!("{}{sep}{}{sep}{:.3}", d.id, d.name, d.average_score))
            .collect(),
        QueryOutput::Users(users) => users.iter()
            .map(|u| format!("{}{sep}{}{sep}{}", u.username, u.name, u.total_distance))
            .collect(),
        QueryOutput::Scalar(value) => vec![format!("{:.3}", value)],
        QueryOutput::Rides(rides) => rides.iter()
            .map(|r| format!(
                "{}{sep}{}{sep}{}{sep}{}{sep}{:.3}",
                r.id, r.date.format(DATE_FORMAT), r.distance, r.city, r.tip
            ))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::core::types::{DriverId, Gender, RideId};
    use crate::search::results::{Profile, RankedDriver, RankedUser, RideSummary};

    #[test]
    fn profile_line() {
        let profile = Profile {
            name: "Ana Silva".into(),
            gender: Gender::Female,
            age: 32,
            average_score: 4.5,
            ride_count: 2,
            total_amount: 21.35,
        };
        assert_eq!(format_output(&QueryOutput::Profile(Some(profile))),
                   vec!["Ana Silva;F;32;4.500;2;21.350"]);
        assert!(format_output(&QueryOutput::Profile(None)).is_empty());
    }

    #[test]
    fn ranked_lines() {
        let drivers = QueryOutput::Drivers(vec![RankedDriver {
            id: DriverId(42),
            name: "Rui".into(),
            average_score: 4.0,
        }]);
        assert_eq!(format_output(&drivers), vec!["000000000042;Rui;4.000"]);

        let users = QueryOutput::Users(vec![RankedUser {
            username: "ana1".into(),
            name: "Ana".into(),
            total_distance: 17,
        }]);
        assert_eq!(format_output(&users), vec!["ana1;Ana;17"]);
    }

    #[test]
    fn scalar_and_ride_lines() {
        assert_eq!(format_output(&QueryOutput::Scalar(40.0)), vec!["40.000"]);

        let rides = QueryOutput::Rides(vec![RideSummary {
            id: RideId(7),
            date: NaiveDate::from_ymd_opt(2021, 9, 28).unwrap(),
            distance: 12,
            city: "Porto".into(),
            tip: 1.5,
        }]);
        assert_eq!(format_output(&rides), vec!["000000000007;28/09/2021;12;Porto;1.500"]);
    }

    #[test]
    fn file_sink_writes_one_file_per_command() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::new(dir.path().join("out")).unwrap();
        sink.write_output(3, &["a".to_string(), "b".to_string()]).unwrap();
        sink.write_output(4, &[]).unwrap();

        let written = fs::read_to_string(command_output_path(sink.dir(), 3)).unwrap();
        assert_eq!(written, "a\nb\n");
        assert_eq!(fs::read_to_string(command_output_path(sink.dir(), 4)).unwrap(), "");
    }

    #[test]
    fn buffer_sink_keeps_order() {
        let mut sink = BufferSink::new();
        sink.write_output(1, &["x".to_string()]).unwrap();
        sink.write_output(2, &[]).unwrap();
        assert_eq!(sink.lines(1), Some(&["x".to_string()][..]));
        assert_eq!(sink.lines(2), Some(&[][..]));
        assert_eq!(sink.lines(3), None);
    }
}
