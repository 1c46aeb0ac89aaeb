//! Tolerant reading of centerline point rows.
//!
//! Each meaningful line is `x y z [radius]`, delimited by any mix of commas, semicolons, tabs or
//! spaces. Blank lines and `#` comments are ignored, a single label row (such as `x,y,z,r`) ahead
//! of the data is detected and skipped, and any other row that is not three leading numbers is
//! dropped without failing the read.
use super::*;
use std::{io::BufRead, path::Path};

/// The points read from a centerline source, in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ingested {
    pub points: Vec<CenterlinePoint>,
    /// A non-numeric row with 3 or more fields was seen before the first data row.
    pub had_header: bool,
}

impl Ingested {
    /// Diagnostics over the read points, valid for any point count.
    pub fn report(&self) -> BoundsReport {
        BoundsReport::new(&self.points, self.had_header)
    }

    /// Fails with [`Error::NotEnoughPoints`] if fewer than 2 points were read.
    pub fn into_centerline(self) -> crate::Result<Centerline> {
        Centerline::new(self.points)
    }
}

/// Parse centerline rows from lines of text.
///
/// # Example
/// ```rust
/// # use tube::io::centerline::*;
/// let x = parse_lines(["x,y,z", "0,0,0", "1;0;0", "# done"]);
/// assert!(x.had_header);
/// assert_eq!(x.points.len(), 2);
/// ```
pub fn parse_lines<I, S>(lines: I) -> Ingested
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut x = Ingested::default();

    for (i, line) in lines.into_iter().enumerate() {
        match classify(line.as_ref()) {
            Row::Skip => (),
            Row::Data(p) => x.points.push(p),
            Row::Other { fields } if x.points.is_empty() && fields >= 3 => {
                log::debug!("line {}: treating as header row", i + 1);
                x.had_header = true;
            }
            Row::Other { .. } => log::debug!("line {}: skipping malformed row", i + 1),
        }
    }

    log::debug!(
        "read {} centerline points (header: {})",
        x.points.len(),
        x.had_header
    );

    x
}

/// Parse centerline rows from a block of text.
pub fn from_str(text: &str) -> Ingested {
    parse_lines(text.lines())
}

/// Read centerline rows from a buffered reader.
///
/// Failure to read (including invalid UTF-8) is an [`Error::Io`], a malformed row is not.
pub fn from_reader<R: BufRead>(reader: R) -> crate::Result<Ingested> {
    let lines = reader.lines().collect::<std::io::Result<Vec<_>>>()?;
    Ok(parse_lines(lines))
}

/// Read centerline rows from a file.
pub fn from_path<P: AsRef<Path>>(path: P) -> crate::Result<Ingested> {
    let file = std::fs::File::open(path.as_ref())?;
    from_reader(std::io::BufReader::new(file))
}

/// Read a file and build the centerline from it, returning it along with the header flag.
pub fn read_centerline<P: AsRef<Path>>(path: P) -> crate::Result<(Centerline, bool)> {
    let x = from_path(path)?;
    let had_header = x.had_header;
    Ok((x.into_centerline()?, had_header))
}

enum Row {
    /// Blank or comment, counts for nothing.
    Skip,
    Data(CenterlinePoint),
    /// Not a data row, with this many fields.
    Other { fields: usize },
}

fn classify(line: &str) -> Row {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Row::Skip;
    }

    let fields = fields(line).collect::<Vec<_>>();

    let xyz = match fields.as_slice() {
        [x, y, z, ..] => real(x).zip(real(y)).zip(real(z)),
        _ => None,
    };

    match xyz {
        Some(((x, y), z)) => Row::Data(CenterlinePoint {
            position: [x, y, z],
            radius: fields.get(3).and_then(|r| real(r)),
        }),
        None => Row::Other {
            fields: fields.len(),
        },
    }
}

/// Split a row on commas, semicolons and whitespace, dropping empty fields.
fn fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|s| !s.is_empty())
}

/// Parse a field as a real number, only if the **whole** field is the number.
///
/// `"3.5abc"` is rejected rather than read as `3.5`.
fn real(field: &str) -> Option<f64> {
    use nom::{combinator::all_consuming, number::complete::double, IResult};

    let r: IResult<&str, f64, ()> = all_consuming(double)(field.trim());
    r.ok().map(|(_, x)| x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xyz(x: &Ingested) -> Vec<Point3> {
        x.points.iter().map(|p| p.position).collect()
    }

    #[test]
    fn real_number_fields() {
        assert_eq!(real("1"), Some(1.0));
        assert_eq!(real("-2.5"), Some(-2.5));
        assert_eq!(real("+.5"), Some(0.5));
        assert_eq!(real("1e3"), Some(1000.0));
        assert_eq!(real("6.02E-2"), Some(0.0602));
        assert_eq!(real(" 4 "), Some(4.0));

        assert_eq!(real("3.5abc"), None);
        assert_eq!(real("abc"), None);
        assert_eq!(real("1.2.3"), None);
        assert_eq!(real(""), None);
        assert_eq!(real("-"), None);
    }

    #[test]
    fn delimiters_are_interchangeable() {
        let exp = vec![[1.5, -2.0, 3.25]];
        for line in [
            "1.5,-2,3.25",
            "1.5;-2;3.25",
            "1.5\t-2\t3.25",
            "1.5 -2 3.25",
            "1.5, -2;\t3.25",
            "  1.5,,-2 ;3.25  ",
        ] {
            let x = parse_lines([line]);
            assert_eq!(xyz(&x), exp, "line: {:?}", line);
            assert_eq!(x.points[0].radius, None);
        }
    }

    #[test]
    fn header_detected() {
        let x = from_str("x,y,z\n0,0,0\n1,0,0\n");
        assert!(x.had_header);
        assert_eq!(x.points.len(), 2);

        let x = from_str("0,0,0\n1,0,0\n");
        assert!(!x.had_header);
        assert_eq!(x.points.len(), 2);
    }

    #[test]
    fn header_needs_three_fields() {
        let x = from_str("x,y\n0,0,0\n1,0,0\n");
        assert!(!x.had_header);
        assert_eq!(x.points.len(), 2);
    }

    #[test]
    fn header_after_comments_and_blanks() {
        let x = from_str("# exported centerline\n\n   \nX;Y;Z;R\n0;0;0;1\n1;0;0;1\n");
        assert!(x.had_header);
        assert_eq!(x.points.len(), 2);
    }

    #[test]
    fn labels_after_data_are_not_a_header() {
        let x = from_str("0,0,0\nx,y,z\n1,0,0\n");
        assert!(!x.had_header);
        assert_eq!(xyz(&x), vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let x = from_str("0,0,0\n1,2,abc\n3.5abc,1,1\n2,0,0\n");
        assert_eq!(xyz(&x), vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        assert!(x.into_centerline().is_ok());

        let x = from_str("1,2,abc\n4,5,def\n");
        assert!(x.had_header); // the first looks like a label row
        assert!(x.points.is_empty());
        assert!(matches!(
            x.into_centerline(),
            Err(Error::NotEnoughPoints { found: 0 })
        ));
    }

    #[test]
    fn radius_column() {
        let x = from_str("0,0,0,0.1\n1,0,0,0.5\n2,0,0,wide\n3,0,0\n4,0,0,1,extra\n");
        let rs = x.points.iter().map(|p| p.radius).collect::<Vec<_>>();
        assert_eq!(rs, vec![Some(0.1), Some(0.5), None, None, Some(1.0)]);
    }

    #[test]
    fn header_then_radii() {
        let x = from_str("x,y,z,r\n0,0,0,0.1\n1,0,0,0.5\n");
        assert!(x.had_header);
        assert_eq!(x.points.len(), 2);
        assert!(x.points.iter().all(|p| p.has_radius()));
        assert_eq!(x.points[0].radius, Some(0.1));
        assert_eq!(x.points[1].radius, Some(0.5));
    }

    #[test]
    fn nothing_to_read() {
        for text in ["", "\n\n", "# a\n  # b\n\n"] {
            let x = from_str(text);
            assert!(!x.had_header);
            assert!(matches!(
                x.into_centerline(),
                Err(Error::NotEnoughPoints { found: 0 })
            ));
        }

        let x = from_str("0,0,0\n");
        assert!(matches!(
            x.into_centerline(),
            Err(Error::NotEnoughPoints { found: 1 })
        ));
    }

    #[test]
    fn crlf_lines() {
        let x = from_str("x,y,z\r\n0,0,0\r\n1,0,0\r\n");
        assert!(x.had_header);
        assert_eq!(x.points.len(), 2);
    }

    #[test]
    fn reader_and_missing_file() {
        let x = from_reader(Cursor::new("0 0 0\n0 0 1\n")).unwrap();
        assert_eq!(x.points.len(), 2);

        let e = from_path("this/file/does/not/exist.csv").unwrap_err();
        assert!(matches!(e, Error::Io(_)));
    }
}
