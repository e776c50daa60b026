use uuid::Uuid;

/// Source of the values written to the `unique-id` column.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random (v4) UUIDs in their canonical hyphenated form.
///
/// Values are not checked against previously generated ones, a collision is
/// considered negligible.
#[derive(Debug, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().hyphenated().to_string()
    }
}

/// Deterministic ids (`0`, `1`, `2`, ...) for reproducible output.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct SequentialGenerator(u64);

#[cfg(test)]
impl IdGenerator for SequentialGenerator {
    fn next_id(&mut self) -> String {
        let id = self.0;
        self.0 += 1;
        id.to_string()
    }
}

#[cfg(test)]
pub fn is_canonical_uuid(value: &str) -> bool {
    let groups: Vec<&str> = value.split('-').collect();
    groups.len() == 5
        && groups
            .iter()
            .zip([8, 4, 4, 4, 12])
            .all(|(group, len)| {
                group.len() == len
                    && group
                        .chars()
                        .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
            })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_format() {
        let mut gen = UuidGenerator;
        let id = gen.next_id();
        assert_eq!(id.len(), 36);
        assert!(is_canonical_uuid(&id), "unexpected id format: {id}");
    }

    #[test]
    fn test_uuids_differ() {
        let mut gen = UuidGenerator;
        assert_ne!(gen.next_id(), gen.next_id());
    }

    #[test]
    fn test_sequential() {
        let mut gen = SequentialGenerator::default();
        assert_eq!(gen.next_id(), "0");
        assert_eq!(gen.next_id(), "1");
        assert_eq!(gen.next_id(), "2");
    }

    #[test]
    fn test_is_canonical_uuid() {
        assert!(is_canonical_uuid("123e4567-e89b-42d3-a456-426614174000"));
        assert!(!is_canonical_uuid("123E4567-E89B-42D3-A456-426614174000"));
        assert!(!is_canonical_uuid("123e4567e89b42d3a456426614174000"));
        assert!(!is_canonical_uuid("123e4567-e89b-42d3-a456-42661417400"));
    }
}
