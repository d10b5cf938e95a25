//! The per-attendee processing pass.
//!
//! Each roster row is cleaned, looked up, rendered and saved before the
//! next one is read. Per-record problems (bad phone, bad date, failed
//! lookup) are replaced by absent values or the fallback message; only
//! I/O faults on the output side end the pass.

use crate::analysis::{peak_hours, peak_weekdays};
use crate::civic::{lookup_or_fallback, RepresentativeLookup};
use crate::cleaning::clean_record;
use crate::letter::{LetterTemplate, LetterWriter};
use crate::models::{AttendeeRecord, FrequencyRanking, LetterContext, RegistrationTime};
use crate::roster::Roster;
use anyhow::{Context, Result};
use std::io::{Read, Write};
use tracing::{debug, warn};

/// Registration times collected over the pass, in roster order.
#[derive(Debug, Clone, Default)]
pub struct RegistrationLog {
    times: Vec<RegistrationTime>,
}

impl RegistrationLog {
    pub fn push(&mut self, time: RegistrationTime) {
        self.times.push(time);
    }

    pub fn times(&self) -> &[RegistrationTime] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Totals and collected timestamps for a completed pass.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub registrations: RegistrationLog,
    pub records: usize,
    pub letters_written: usize,
    pub lookup_fallbacks: usize,
    pub unparsed_dates: usize,
    pub skipped_rows: usize,
}

impl RunSummary {
    pub fn peak_hours(&self) -> FrequencyRanking<u32> {
        peak_hours(self.registrations.times())
    }

    pub fn peak_weekdays(&self) -> FrequencyRanking<&'static str> {
        peak_weekdays(self.registrations.times())
    }
}

/// Collaborators used by the pass.
pub struct Pipeline<'a, L> {
    lookup: &'a L,
    template: &'a LetterTemplate,
    writer: &'a LetterWriter,
}

impl<'a, L: RepresentativeLookup> Pipeline<'a, L> {
    pub fn new(lookup: &'a L, template: &'a LetterTemplate, writer: &'a LetterWriter) -> Self {
        Self {
            lookup,
            template,
            writer,
        }
    }

    /// Process every roster row in order, writing progress lines to `out`.
    pub async fn run<R: Read, W: Write>(
        &self,
        roster: &mut Roster<R>,
        out: &mut W,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for row in roster.records() {
            let record = match row {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping roster row: {}", e);
                    summary.skipped_rows += 1;
                    continue;
                }
            };

            self.process_record(&record, &mut summary, out).await?;
        }

        Ok(summary)
    }

    async fn process_record<W: Write>(
        &self,
        record: &AttendeeRecord,
        summary: &mut RunSummary,
        out: &mut W,
    ) -> Result<()> {
        summary.records += 1;
        let cleaned = clean_record(record);

        match cleaned.registration {
            Some(time) => {
                debug!("Attendee {} registered at {}", record.id, time);
                summary.registrations.push(time);
            }
            None => summary.unparsed_dates += 1,
        }

        let legislators = lookup_or_fallback(self.lookup, &cleaned.zipcode).await;
        if legislators.is_fallback() {
            summary.lookup_fallbacks += 1;
        }

        let context = LetterContext {
            id: &record.id,
            name: &record.first_name,
            zipcode: &cleaned.zipcode,
            phone: cleaned.phone.as_deref(),
            regdate: &record.regdate,
            legislators: &legislators,
        };

        let letter = self.template.render(&context);
        self.writer.save(&record.id, &letter)?;
        summary.letters_written += 1;
        debug!("Processed attendee {}", record.id);

        writeln!(
            out,
            "{} {} {} {}",
            record.first_name,
            cleaned.zipcode,
            cleaned.phone.as_deref().unwrap_or_default(),
            record.regdate
        )
        .context("Failed to write progress line")?;

        Ok(())
    }
}

/// Print both rankings in descending-count order.
pub fn print_rankings<W: Write>(summary: &RunSummary, out: &mut W) -> Result<()> {
    if summary.registrations.is_empty() {
        warn!("No registration dates could be parsed; rankings are empty");
    }

    writeln!(out, "Peak registration hours and user counts:")?;
    for (hour, count) in summary.peak_hours() {
        writeln!(out, "Hour: {}, Count: {}", hour, count)?;
    }

    writeln!(out, "Peak registration days and user counts:")?;
    for (day, count) in summary.peak_weekdays() {
        writeln!(out, "Day: {}, Count: {}", day, count)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::civic::{LookupError, FALLBACK_MESSAGE};
    use crate::models::Official;
    use std::cell::Cell;

    const HEADER: &str = ",RegDate,first_Name,last_Name,Email_Address,HomePhone,Street,City,State,Zipcode\n";

    /// Answers with one official, failing on the zip codes listed.
    struct StubLookup {
        failing_zips: Vec<&'static str>,
        calls: Cell<usize>,
    }

    impl StubLookup {
        fn new(failing_zips: Vec<&'static str>) -> Self {
            Self {
                failing_zips,
                calls: Cell::new(0),
            }
        }
    }

    impl RepresentativeLookup for StubLookup {
        async fn legislators_by_zipcode(
            &self,
            zipcode: &str,
        ) -> Result<Vec<Official>, LookupError> {
            self.calls.set(self.calls.get() + 1);
            if self.failing_zips.iter().any(|z| *z == zipcode) {
                return Err(LookupError::Api {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            Ok(vec![Official {
                name: format!("Rep for {}", zipcode),
                party: None,
                phones: vec![],
                urls: vec![],
            }])
        }
    }

    fn run_pipeline(
        csv: impl AsRef<[u8]>,
        lookup: &StubLookup,
        output_dir: &std::path::Path,
    ) -> (RunSummary, String) {
        let template = LetterTemplate::parse(
            "<h1>Thanks {{name}}</h1>\n<p>{{phone}}</p>\n<div>{{legislators}}</div>",
        )
        .unwrap();
        let writer = LetterWriter::new(output_dir);
        let pipeline = Pipeline::new(lookup, &template, &writer);

        let mut roster = Roster::from_reader(csv.as_ref()).unwrap();
        let mut out = Vec::new();
        let summary = tokio_test::block_on(pipeline.run(&mut roster, &mut out)).unwrap();

        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_single_record_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let csv = format!(
            "{}1,11/12/08 10:47,Allison,Nguyen,a@example.com,6154385000,3155 19th St NW,Washington,DC,20010\n",
            HEADER
        );
        let lookup = StubLookup::new(vec![]);

        let (summary, progress) = run_pipeline(&csv, &lookup, dir.path());

        let letters: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(letters.len(), 1);

        let letter = std::fs::read_to_string(dir.path().join("thanks_1.html")).unwrap();
        assert!(letter.contains("Thanks Allison"));
        assert!(letter.contains("Rep for 20010"));

        assert_eq!(progress, "Allison 20010 6154385000 11/12/08 10:47\n");
        assert_eq!(summary.records, 1);
        assert_eq!(summary.letters_written, 1);
        assert_eq!(summary.peak_hours(), vec![(10, 1)]);
        assert_eq!(summary.peak_weekdays(), vec![("Wednesday", 1)]);
    }

    #[test]
    fn test_failed_lookup_still_writes_letter() {
        let dir = tempfile::tempdir().unwrap();
        let csv = format!(
            "{}1,11/12/08 10:47,Allison,Nguyen,a@example.com,6154385000,x,Washington,DC,20010\n\
             2,11/12/08 13:23,Sarah,Hankins,b@example.com,414-520-5000,y,Washington,DC,20009\n",
            HEADER
        );
        let lookup = StubLookup::new(vec!["20010"]);

        let (summary, _) = run_pipeline(&csv, &lookup, dir.path());

        let first = std::fs::read_to_string(dir.path().join("thanks_1.html")).unwrap();
        assert!(first.contains(FALLBACK_MESSAGE));

        let second = std::fs::read_to_string(dir.path().join("thanks_2.html")).unwrap();
        assert!(second.contains("Rep for 20009"));

        assert_eq!(lookup.calls.get(), 2);
        assert_eq!(summary.lookup_fallbacks, 1);
        assert_eq!(summary.letters_written, 2);
    }

    #[test]
    fn test_bad_fields_do_not_stop_the_pass() {
        let dir = tempfile::tempdir().unwrap();
        let csv = format!(
            "{}5,not a date,Bob,Smith,c@example.com,555-1234,z,Nowhere,ZZ,\n\
             6,2/3/09 18:01,Eve,Adams,d@example.com,1-315-450-6000,w,Syracuse,NY,13210\n",
            HEADER
        );
        let lookup = StubLookup::new(vec![]);

        let (summary, progress) = run_pipeline(&csv, &lookup, dir.path());

        assert_eq!(summary.records, 2);
        assert_eq!(summary.letters_written, 2);
        assert_eq!(summary.unparsed_dates, 1);
        assert_eq!(summary.registrations.len(), 1);
        assert_eq!(summary.peak_hours(), vec![(18, 1)]);

        let mut lines = progress.lines();
        assert_eq!(lines.next(), Some("Bob 00000  not a date"));
        assert_eq!(lines.next(), Some("Eve 13210 3154506000 2/3/09 18:01"));

        let letter = std::fs::read_to_string(dir.path().join("thanks_5.html")).unwrap();
        assert!(letter.contains("<p></p>"));
    }

    #[test]
    fn test_latin1_name_still_gets_a_letter() {
        let dir = tempfile::tempdir().unwrap();
        let mut csv = HEADER.as_bytes().to_vec();
        csv.extend_from_slice(
            b"1,11/12/08 10:47,Jos\xe9,Nguyen,a@example.com,6154385000,s,c,DC,20010\n",
        );
        csv.extend_from_slice(
            b"2,11/12/08 13:23,Sarah,Hankins,b@example.com,414-520-5000,s,c,DC,20009\n",
        );
        let lookup = StubLookup::new(vec![]);

        let (summary, progress) = run_pipeline(&csv, &lookup, dir.path());

        assert_eq!(summary.records, 2);
        assert_eq!(summary.letters_written, 2);
        assert_eq!(summary.skipped_rows, 0);
        assert!(dir.path().join("thanks_1.html").exists());
        assert!(dir.path().join("thanks_2.html").exists());
        assert!(progress.starts_with("Jos\u{FFFD} 20010 6154385000"));
    }

    #[test]
    fn test_print_rankings() {
        let dir = tempfile::tempdir().unwrap();
        let csv = format!(
            "{}1,11/12/08 10:47,A,X,a@example.com,,s,c,DC,20010\n\
             2,11/12/08 10:05,B,X,b@example.com,,s,c,DC,20010\n\
             3,11/13/08 22:10,C,X,c@example.com,,s,c,DC,20010\n",
            HEADER
        );
        let lookup = StubLookup::new(vec![]);
        let (summary, _) = run_pipeline(&csv, &lookup, dir.path());

        let mut out = Vec::new();
        print_rankings(&summary, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Peak registration hours and user counts:\n\
             Hour: 10, Count: 2\n\
             Hour: 22, Count: 1\n\
             Peak registration days and user counts:\n\
             Day: Wednesday, Count: 2\n\
             Day: Thursday, Count: 1\n"
        );
    }

    #[test]
    fn test_registration_log() {
        let mut log = RegistrationLog::default();
        assert!(log.is_empty());

        let time = crate::cleaning::parse_registration_timestamp(
            "04/19/17 18:30",
            crate::cleaning::REGISTRATION_FORMAT,
        )
        .unwrap();
        log.push(time);

        assert_eq!(log.len(), 1);
        assert_eq!(log.times()[0].hour(), 18);
    }
}
