//! Line-oriented text format for the two weight matrices.
//!
//! ```text
//! The weights between input layer and hidden layer.
//! 3 4
//! 0.12 -0.4 0.33 0.05
//! ...
//! The weights between hidden layer and output layer.
//! 5 1
//! 0.7
//! ...
//! ```
//!
//! Each block is a free-text label line, a `rows cols` line and one line of
//! space-separated values per matrix row. Values use the shortest text that
//! parses back to the same `f64`, so a save followed by a load is exact.
use crate::error::{NetworkError, Result, WeightSection};
use crate::network::Network;
use crate::weights::check_shape;
use matrix::Matrix;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::path::Path;

pub const INPUT_HIDDEN_LABEL: &str = "The weights between input layer and hidden layer.";
pub const HIDDEN_OUTPUT_LABEL: &str = "The weights between hidden layer and output layer.";

impl Network {
    /// Writes both weight matrices to `path`, replacing any existing file.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use neural_network::{Network, NetworkConfig};
    ///
    /// let network = Network::new(NetworkConfig::bipolar_xor()).unwrap();
    /// network.save("weights.txt").unwrap();
    /// ```
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_weights(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_weights<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_block(writer, INPUT_HIDDEN_LABEL, self.weights().input_hidden())?;
        write_block(writer, HIDDEN_OUTPUT_LABEL, self.weights().hidden_output())?;
        Ok(())
    }

    /// Loads weights previously written by [`Network::save`].
    ///
    /// Both blocks are parsed and checked against this network's shape before
    /// anything is replaced, so a failed load leaves the weights untouched.
    /// Momentum buffers are never modified.
    ///
    /// # Errors
    ///
    /// * [`NetworkError::Io`] if the file cannot be read.
    /// * [`NetworkError::ShapeMismatch`] if a block's dimensions differ from
    ///   this network's configuration.
    /// * [`NetworkError::Malformed`] for missing lines, wrong value counts or
    ///   unparsable numbers.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let file = File::open(path)?;
        self.read_weights(BufReader::new(file))
    }

    pub fn read_weights<R: BufRead>(&mut self, reader: R) -> Result<()> {
        let mut lines = NumberedLines::new(reader);

        let input_hidden = read_block(
            &mut lines,
            WeightSection::InputHidden,
            self.config().input_hidden_shape(),
        )?;
        let hidden_output = read_block(
            &mut lines,
            WeightSection::HiddenOutput,
            self.config().hidden_output_shape(),
        )?;

        self.set_weights(input_hidden, hidden_output)
    }
}

fn write_block<W: Write>(writer: &mut W, label: &str, matrix: &Matrix) -> Result<()> {
    writeln!(writer, "{label}")?;
    writeln!(writer, "{} {}", matrix.rows(), matrix.cols())?;
    for row in matrix.iter_rows() {
        let line = row
            .iter()
            .map(f64::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(writer, "{line}")?;
    }
    Ok(())
}

/// Lines of the input, counted from 1 for error messages.
struct NumberedLines<R> {
    lines: Lines<R>,
    number: usize,
}

impl<R: BufRead> NumberedLines<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            number: 0,
        }
    }

    fn next_line(&mut self, expected: &str) -> Result<String> {
        self.number += 1;
        match self.lines.next() {
            Some(line) => Ok(line?),
            None => Err(self.malformed(format!("unexpected end of file, expected {expected}"))),
        }
    }

    fn malformed(&self, reason: String) -> NetworkError {
        NetworkError::Malformed {
            line: self.number,
            reason,
        }
    }
}

fn read_block<R: BufRead>(
    lines: &mut NumberedLines<R>,
    section: WeightSection,
    expected: (usize, usize),
) -> Result<Matrix> {
    lines.next_line(&format!("the {section} label"))?;

    let dimensions = lines.next_line(&format!("the {section} dimensions"))?;
    let found = parse_dimensions(&dimensions).map_err(|reason| lines.malformed(reason))?;
    check_shape(section, expected, found)?;

    let (rows, cols) = expected;
    let mut data = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        let line = lines.next_line(&format!("{section} row {row}"))?;
        parse_row(&line, cols, &mut data).map_err(|reason| lines.malformed(reason))?;
    }

    Ok(Matrix::new(rows, cols, data))
}

fn parse_dimensions(line: &str) -> std::result::Result<(usize, usize), String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [rows, cols] = tokens.as_slice() else {
        return Err(format!(
            "expected two dimensions \"<rows> <cols>\", found {:?}",
            line
        ));
    };
    Ok((parse_dimension(rows)?, parse_dimension(cols)?))
}

fn parse_dimension(token: &str) -> std::result::Result<usize, String> {
    token
        .parse::<usize>()
        .map_err(|_| format!("invalid dimension {token:?}"))
}

fn parse_row(line: &str, cols: usize, data: &mut Vec<f64>) -> std::result::Result<(), String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != cols {
        return Err(format!("expected {cols} values, found {}", tokens.len()));
    }
    for token in tokens {
        let value = token
            .parse::<f64>()
            .map_err(|_| format!("invalid weight {token:?}"))?;
        if !value.is_finite() {
            return Err(format!("weight {token:?} is not finite"));
        }
        data.push(value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network_config::NetworkConfig;
    use std::fs;
    use std::io::Cursor;
    use tempfile::{NamedTempFile, tempdir};

    fn trained_like_network(seed: u64) -> Network {
        // random weights plus a few values that need every digit to survive
        let mut network = Network::with_seed(NetworkConfig::bipolar_xor(), seed).unwrap();
        let mut input_hidden = network.weights().input_hidden().clone();
        input_hidden[(0, 0)] = 0.1 + 0.2;
        input_hidden[(1, 3)] = -1.0e-17;
        input_hidden[(2, 1)] = 12345.678901234567;
        let hidden_output = network.weights().hidden_output().clone();
        network.set_weights(input_hidden, hidden_output).unwrap();
        network
    }

    #[test]
    fn test_save_and_load_round_trip() -> Result<()> {
        let network = trained_like_network(1);
        let temp_file = NamedTempFile::new()?;
        network.save(temp_file.path())?;

        let mut restored = Network::with_seed(NetworkConfig::bipolar_xor(), 99)?;
        assert_ne!(restored.weights().input_hidden(), network.weights().input_hidden());

        restored.load(temp_file.path())?;

        // exact, not approximate
        assert_eq!(restored.weights().input_hidden(), network.weights().input_hidden());
        assert_eq!(restored.weights().hidden_output(), network.weights().hidden_output());
        Ok(())
    }

    #[test]
    fn test_file_layout() -> Result<()> {
        let network = Network::with_seed(NetworkConfig::bipolar_xor(), 4)?;
        let mut buffer = Vec::new();
        network.write_weights(&mut buffer)?;

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 1 + 1 + 3 + 1 + 1 + 5);
        assert_eq!(lines[0], INPUT_HIDDEN_LABEL);
        assert_eq!(lines[1], "3 4");
        for row in &lines[2..5] {
            assert_eq!(row.split(' ').count(), 4);
        }
        assert_eq!(lines[5], HIDDEN_OUTPUT_LABEL);
        assert_eq!(lines[6], "5 1");
        for row in &lines[7..12] {
            assert_eq!(row.split(' ').count(), 1);
        }
        Ok(())
    }

    #[test]
    fn test_reads_trailing_spaces() -> Result<()> {
        let text = "input to hidden\n\
                    2 1 \n\
                    0.5 \n\
                    -0.25 \n\
                    hidden to output\n\
                    2 1\n\
                    1 \n\
                    -1 \n";
        let config = NetworkConfig {
            num_inputs: 1,
            num_hidden: 1,
            ..NetworkConfig::bipolar_xor()
        };
        let mut network = Network::with_seed(config, 0)?;

        network.read_weights(Cursor::new(text))?;

        assert_eq!(network.weights().input_hidden().data(), &[0.5, -0.25]);
        assert_eq!(network.weights().hidden_output().data(), &[1.0, -1.0]);
        Ok(())
    }

    #[test]
    fn test_load_shape_mismatch_leaves_weights() -> Result<()> {
        let saved = Network::with_seed(NetworkConfig::bipolar_xor(), 1)?;
        let temp_file = NamedTempFile::new()?;
        saved.save(temp_file.path())?;

        let mut smaller = Network::with_seed(
            NetworkConfig {
                num_hidden: 3,
                ..NetworkConfig::bipolar_xor()
            },
            2,
        )?;
        let before = smaller.weights().clone();

        let result = smaller.load(temp_file.path());

        match result {
            Err(NetworkError::ShapeMismatch {
                section,
                expected,
                found,
            }) => {
                assert_eq!(section, WeightSection::InputHidden);
                assert_eq!(expected, (3, 3).into());
                assert_eq!(found, (3, 4).into());
            }
            other => panic!("expected shape mismatch, got {other:?}"),
        }
        assert_eq!(smaller.weights(), &before);
        Ok(())
    }

    #[test]
    fn test_second_block_mismatch_leaves_first_block() -> Result<()> {
        let saved = Network::with_seed(NetworkConfig::bipolar_xor(), 1)?;
        let mut buffer = Vec::new();
        saved.write_weights(&mut buffer)?;

        // same input-to-hidden shape, one more output
        let mut wider = Network::with_seed(
            NetworkConfig {
                num_outputs: 2,
                ..NetworkConfig::bipolar_xor()
            },
            2,
        )?;
        let before = wider.weights().clone();

        let result = wider.read_weights(Cursor::new(buffer));

        assert!(matches!(
            result,
            Err(NetworkError::ShapeMismatch {
                section: WeightSection::HiddenOutput,
                ..
            })
        ));
        assert_eq!(wider.weights(), &before);
        Ok(())
    }

    #[test]
    fn test_malformed_files() -> Result<()> {
        let cases = [
            ("", 1, "end of file"),
            ("label\n3\n", 2, "two dimensions"),
            ("label\n3 x\n", 2, "invalid dimension"),
            ("label\n3 4\n0.1 0.2 0.3 0.4\n0.1 0.2 0.3\n", 4, "expected 4 values"),
            ("label\n3 4\n0.1 0.2 oops 0.4\n", 3, "invalid weight"),
            ("label\n3 4\n0.1 0.2 NaN 0.4\n", 3, "not finite"),
            ("label\n3 4\n1 1 1 1\n1 1 1 1\n", 5, "end of file"),
        ];

        for (text, expected_line, expected_reason) in cases {
            let mut network = Network::with_seed(NetworkConfig::bipolar_xor(), 0)?;
            let before = network.weights().clone();

            match network.read_weights(Cursor::new(text)) {
                Err(NetworkError::Malformed { line, reason }) => {
                    assert_eq!(line, expected_line, "{text:?}: {reason}");
                    assert!(reason.contains(expected_reason), "{text:?}: {reason}");
                }
                other => panic!("{text:?}: expected malformed error, got {other:?}"),
            }
            assert_eq!(network.weights(), &before);
        }
        Ok(())
    }

    #[test]
    fn test_load_keeps_momentum() -> Result<()> {
        let samples = crate::TrainingSet::new(
            vec![vec![-1.0, 1.0], vec![1.0, 1.0]],
            vec![vec![1.0], vec![-1.0]],
        )?;
        let mut network = Network::with_seed(NetworkConfig::bipolar_xor(), 8)?;
        network.train_epoch(&samples, crate::ErrorMeasure::FirstOutput)?;
        let deltas = network.weights().hidden_output_delta().clone();

        let other = Network::with_seed(NetworkConfig::bipolar_xor(), 9)?;
        let mut buffer = Vec::new();
        other.write_weights(&mut buffer)?;
        network.read_weights(Cursor::new(buffer))?;

        assert_eq!(network.weights().hidden_output(), other.weights().hidden_output());
        assert_eq!(network.weights().hidden_output_delta(), &deltas);
        Ok(())
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let mut network = Network::with_seed(NetworkConfig::bipolar_xor(), 0).unwrap();
        let result = network.load(dir.path().join("missing.txt"));
        assert!(matches!(result, Err(NetworkError::Io(_))));
    }

    #[test]
    fn test_save_into_missing_directory() {
        let dir = tempdir().unwrap();
        let network = Network::with_seed(NetworkConfig::bipolar_xor(), 0).unwrap();
        let result = network.save(dir.path().join("no").join("such").join("weights.txt"));
        assert!(matches!(result, Err(NetworkError::Io(_))));
    }

    #[test]
    fn test_save_overwrites() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("weights.txt");
        let stale = "stale content that is much longer than a weight file ".repeat(100);
        fs::write(&path, stale)?;

        let network = Network::with_seed(NetworkConfig::bipolar_xor(), 0)?;
        network.save(&path)?;

        let text = fs::read_to_string(&path)?;
        assert!(text.starts_with(INPUT_HIDDEN_LABEL));
        assert!(!text.contains("stale"));
        Ok(())
    }
}
