//! XOR truth tables in both encodings.

use neural_network::{Result, TrainingSet};

/// XOR over {0, 1}.
pub fn binary_xor() -> Result<TrainingSet> {
    xor(0.0, 1.0)
}

/// XOR over {-1, 1}.
pub fn bipolar_xor() -> Result<TrainingSet> {
    xor(-1.0, 1.0)
}

fn xor(low: f64, high: f64) -> Result<TrainingSet> {
    TrainingSet::new(
        vec![
            vec![low, low],
            vec![low, high],
            vec![high, low],
            vec![high, high],
        ],
        vec![vec![low], vec![high], vec![high], vec![low]],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use neural_network::NetworkConfig;

    #[test]
    fn test_binary_xor_truth_table() {
        let samples = binary_xor().unwrap();
        let rows: Vec<_> = samples.iter().collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], (&[0.0, 0.0][..], &[0.0][..]));
        assert_eq!(rows[1], (&[0.0, 1.0][..], &[1.0][..]));
        assert_eq!(rows[2], (&[1.0, 0.0][..], &[1.0][..]));
        assert_eq!(rows[3], (&[1.0, 1.0][..], &[0.0][..]));
    }

    #[test]
    fn test_bipolar_xor_truth_table() {
        let samples = bipolar_xor().unwrap();
        let rows: Vec<_> = samples.iter().collect();
        assert_eq!(rows[0], (&[-1.0, -1.0][..], &[-1.0][..]));
        assert_eq!(rows[3], (&[1.0, 1.0][..], &[-1.0][..]));
    }

    #[test]
    fn test_datasets_fit_presets() {
        assert!(binary_xor()
            .unwrap()
            .check_against(&NetworkConfig::binary_xor())
            .is_ok());
        assert!(bipolar_xor()
            .unwrap()
            .check_against(&NetworkConfig::bipolar_xor())
            .is_ok());
    }
}
