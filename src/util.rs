pub fn mean<T: Copy + Into<f64>>(data: &[T]) -> Option<f64> {
    let sum = data.iter().map(|&value| value.into()).sum::<f64>();
    let count = data.len();

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}

/// Population standard deviation
pub fn std_dev<T: Copy + Into<f64>>(data: &[T]) -> Option<f64> {
    match (mean(data), data.len()) {
        (Some(data_mean), count) if count > 0 => {
            let variance = data
                .iter()
                .map(|&value| {
                    let diff = data_mean - value.into();

                    diff * diff
                })
                .sum::<f64>()
                / count as f64;

            Some(variance.sqrt())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[10., 20., 30., 15., 22.]), Some(19.4));
        assert_eq!(mean(&[4u8, 5, 3]), Some(4.0));
    }

    #[test]
    fn test_mean_of_ratings() {
        let ratings: Vec<u8> = vec![1, 2, 4, 5];
        assert_eq!(mean(&ratings), Some(3.0));
    }

    #[test]
    fn test_mean_empty_slice() {
        assert_eq!(mean::<u8>(&[]), None);
    }

    #[test]
    fn test_std_dev() {
        assert_eq!(
            std_dev(&[100., 120., 90., 102., 94.]),
            Some(10.322790320451151)
        );
        assert_eq!(std_dev(&[2u8, 4, 4, 4, 5, 5, 7, 9]), Some(2.0));
    }

    #[test]
    fn test_std_dev_single_value() {
        assert_eq!(std_dev(&[3u8]), Some(0.0));
    }

    #[test]
    fn test_std_dev_empty_slice() {
        assert_eq!(std_dev::<f64>(&[]), None);
    }

    #[test]
    fn test_std_dev_identical_values() {
        assert_eq!(std_dev(&[5u8, 5, 5, 5]), Some(0.0));
    }
}
