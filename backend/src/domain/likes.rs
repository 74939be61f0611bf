//! Set-membership bookkeeping over ordered id sequences.

/// Remove `member` if present, otherwise append it.
///
/// Returns `true` when `member` is present afterwards.
///
/// # Examples
/// ```
/// use quizboard::domain::toggle_membership;
///
/// let mut likes = vec!["a".to_owned()];
/// assert!(toggle_membership(&mut likes, &"b".to_owned()));
/// assert!(!toggle_membership(&mut likes, &"a".to_owned()));
/// assert_eq!(likes, vec!["b".to_owned()]);
/// ```
pub fn toggle_membership<T: PartialEq + Clone>(set: &mut Vec<T>, member: &T) -> bool {
    if let Some(position) = set.iter().position(|existing| existing == member) {
        set.remove(position);
        false
    } else {
        set.push(member.clone());
        true
    }
}

/// Append `member` unless already present.
pub fn insert_member<T: PartialEq + Clone>(set: &mut Vec<T>, member: &T) {
    if !set.contains(member) {
        set.push(member.clone());
    }
}

/// Remove every occurrence of `member`.
pub fn remove_member<T: PartialEq>(set: &mut Vec<T>, member: &T) {
    set.retain(|existing| existing != member);
}
