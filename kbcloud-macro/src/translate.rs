/// Makes first character of the given string uppercase and returns the result
fn capitalize(s: &str) -> String {
    modify_first_char(s, char::to_uppercase)
}

/// Makes first character of the given string lowercase and returns the result
fn decapitalize(s: &str) -> String {
    modify_first_char(s, char::to_lowercase)
}

fn modify_first_char<F, R>(s: &str, m: F) -> String
where
    F: FnOnce(char) -> R,
    R: Iterator<Item = char>,
{
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => m(f).collect::<String>() + c.as_str(),
    }
}

/// Turns a Rust field name into the JSON key it is sent as, e.g.
/// `backup_policy_name` into `backupPolicyName`. Leading, trailing and
/// repeated underscores are dropped.
pub(crate) fn field_to_wire_name(field_name: &str) -> String {
    let mut parts = field_name.split('_').filter(|s| !s.is_empty());
    match parts.next() {
        None => String::new(),
        Some(first) => parts.fold(decapitalize(first), |acc, part| acc + &capitalize(part)),
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_single_word() {
        assert_eq!(field_to_wire_name("name"), "name");
        assert_eq!(field_to_wire_name("default"), "default");
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(field_to_wire_name("backup_policy_name"), "backupPolicyName");
        assert_eq!(field_to_wire_name("cluster_id"), "clusterId");
        assert_eq!(field_to_wire_name("page_size"), "pageSize");
    }

    #[test]
    fn test_odd_underscores() {
        assert_eq!(field_to_wire_name("_private"), "private");
        assert_eq!(field_to_wire_name("time__range_"), "timeRange");
        assert_eq!(field_to_wire_name("___"), "");
    }

    #[test]
    fn test_digits_and_caps() {
        assert_eq!(field_to_wire_name("s3_bucket"), "s3Bucket");
        assert_eq!(field_to_wire_name("Engine_name"), "engineName");
    }
}
