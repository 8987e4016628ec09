//! Unit tests for SourcePosition

use core_types::SourcePosition;

#[cfg(test)]
mod source_position_tests {
    use super::*;

    #[test]
    fn test_source_position_large_values() {
        let pos = SourcePosition::new(u32::MAX, u32::MAX);

        assert_eq!(pos.line, u32::MAX);
        assert_eq!(pos.column, u32::MAX);
    }

    #[test]
    fn test_source_position_copy() {
        let pos1 = SourcePosition::new(42, 7);
        let pos2 = pos1;

        assert_eq!(pos1, pos2);
    }

    #[test]
    fn test_source_position_debug() {
        let debug_str = format!("{:?}", SourcePosition::new(1, 2));

        assert!(debug_str.contains("line"));
        assert!(debug_str.contains("column"));
    }

    #[test]
    fn test_source_position_display() {
        assert_eq!(SourcePosition::new(12, 3).to_string(), "12:3");
    }

    #[test]
    fn test_source_position_sorts_by_line_then_column() {
        let mut positions = vec![
            SourcePosition::new(2, 1),
            SourcePosition::new(1, 8),
            SourcePosition::new(1, 2),
        ];
        positions.sort();

        assert_eq!(
            positions,
            vec![
                SourcePosition::new(1, 2),
                SourcePosition::new(1, 8),
                SourcePosition::new(2, 1),
            ]
        );
    }
}
