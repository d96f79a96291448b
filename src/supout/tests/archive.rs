use std::fs::File;
use std::io::{BufReader, Write};

use anyhow::Result;
use supout::{
    encode_section, scan_sections, write_section, DecodeError, Section, SectionError,
    BEGIN_DELIMITER, END_DELIMITER,
};

fn collect(input: &[u8]) -> Result<(Vec<Section>, Vec<SectionError>)> {
    let mut ok = Vec::new();
    let mut failed = Vec::new();
    scan_sections(input, |result| -> Result<()> {
        match result {
            Ok(section) => ok.push(section),
            Err(e) => failed.push(e),
        }
        Ok(())
    })?;
    Ok((ok, failed))
}

#[test]
fn decodes_section_split_across_lines() -> Result<()> {
    let encoded = encode_section("SECTION_A", b"test content")?;

    let mut input = format!("{}\n", BEGIN_DELIMITER);
    for line in encoded.as_bytes().chunks(8) {
        input.push_str(std::str::from_utf8(line)?);
        input.push('\n');
    }
    input.push_str(END_DELIMITER);
    input.push('\n');

    let (sections, failed) = collect(input.as_bytes())?;
    assert!(failed.is_empty());
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].name, "SECTION_A");
    assert_eq!(sections[0].text(), "test content");
    Ok(())
}

#[test]
fn failed_section_does_not_stop_scan() -> Result<()> {
    let mut input = Vec::new();
    write_section(&mut input, "first", b"one")?;
    writeln!(input, "{}\nnot-base64!\n{}", BEGIN_DELIMITER, END_DELIMITER)?;
    write_section(&mut input, "third", b"three")?;

    let (sections, failed) = collect(&input)?;
    let names: Vec<&str> = sections.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["first", "third"]);
    assert_eq!(failed.len(), 1);
    assert!(matches!(failed[0].source, DecodeError::MalformedLength { .. }));
    Ok(())
}

#[test]
fn bad_payload_error_names_section() -> Result<()> {
    // Name terminator present, but payload is not a zlib stream
    let body = supout::reverse_group_encode(b"routing\0XYZ");
    let input = format!("{}\n{}\n{}\n", BEGIN_DELIMITER, body, END_DELIMITER);

    let (sections, failed) = collect(input.as_bytes())?;
    assert!(sections.is_empty());
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].section_name(), Some("routing"));
    assert!(matches!(failed[0].source, DecodeError::InflateInit { .. }));
    Ok(())
}

#[test]
fn binary_junk_between_sections_is_ignored() -> Result<()> {
    let mut input = Vec::new();
    write_section(&mut input, "first", b"one")?;
    input.extend_from_slice(b"\xFF junk\n\x00\x01\x02\n");
    write_section(&mut input, "second", b"two")?;

    let (sections, failed) = collect(&input)?;
    let names: Vec<&str> = sections.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["first", "second"]);
    assert!(failed.is_empty());
    Ok(())
}

#[test]
fn non_text_byte_in_section_fails_that_section_only() -> Result<()> {
    let mut input = format!("{}\n", BEGIN_DELIMITER).into_bytes();
    input.extend_from_slice(b"AA\xFFA\n");
    input.extend_from_slice(format!("{}\n", END_DELIMITER).as_bytes());
    write_section(&mut input, "after", b"decoded")?;

    let (sections, failed) = collect(&input)?;
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].name, "after");
    assert_eq!(failed.len(), 1);
    assert!(matches!(
        failed[0].source,
        DecodeError::InvalidSymbol { symbol: 0xFF, offset: 2 }
    ));
    Ok(())
}

#[test]
fn no_delimiters_yields_nothing() -> Result<()> {
    let summary = scan_sections(&b"just some text\nand more\n"[..], |_| -> Result<()> {
        panic!("no section expected")
    })?;
    assert_eq!(summary.decoded, 0);
    assert_eq!(summary.failed, 0);
    Ok(())
}

#[test]
fn unterminated_section_is_never_decoded() -> Result<()> {
    let encoded = encode_section("dangling", b"never seen")?;
    let input = format!("{}\n{}\n", BEGIN_DELIMITER, encoded);

    let summary = scan_sections(input.as_bytes(), |_| -> Result<()> {
        panic!("no decode expected")
    })?;
    assert_eq!(summary.decoded + summary.failed, 0);
    Ok(())
}

#[test]
fn reads_archive_from_disk() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    write_section(&mut file, "system", b"uptime: 1d")?;
    write_section(&mut file, "interfaces", b"ether1\nether2\n")?;
    file.flush()?;

    let reader = BufReader::new(File::open(file.path())?);
    let mut sections = Vec::new();
    let summary = scan_sections(reader, |result| -> Result<()> {
        if let Ok(section) = result {
            sections.push(section);
        }
        Ok(())
    })?;

    assert_eq!(summary.decoded, 2);
    assert_eq!(sections[0].name, "system");
    assert_eq!(sections[1].text(), "ether1\nether2\n");
    Ok(())
}
