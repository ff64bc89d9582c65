//! Stomp capture resolution.

use crate::core::PlayerId;
use crate::pieces::Face;

/// Indices (ascending) of the pieces captured in a stack after a stomp.
///
/// `owners` lists the owner of each piece bottom to top and `top_face` is the
/// real top face of the top piece. The top owner's run from the top sets the
/// capture depth; walking down from below that run, the first `depth`
/// defender pieces are taken and the top owner's own pieces are skipped.
#[must_use]
pub fn captured_positions(owners: &[PlayerId], top_face: Face) -> Vec<usize> {
    let Some(&top_owner) = owners.last() else {
        return Vec::new();
    };
    if top_face == Face::Blank {
        return Vec::new();
    }

    let depth = owners.iter().rev().take_while(|&&o| o == top_owner).count();
    let below = owners.len() - depth;

    let mut captured: Vec<usize> = (0..below)
        .rev()
        .filter(|&i| owners[i] != top_owner)
        .take(depth)
        .collect();
    captured.reverse();
    captured
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: PlayerId = PlayerId::new(0);
    const B: PlayerId = PlayerId::new(1);

    #[test]
    fn test_depth_one_takes_upper_defender() {
        assert_eq!(captured_positions(&[A, A, B, B, A], Face::Red), vec![3]);
    }

    #[test]
    fn test_depth_two_takes_both() {
        assert_eq!(captured_positions(&[A, B, B, A, A], Face::Blue), vec![1, 2]);
    }

    #[test]
    fn test_sandwich_skips_own_pieces() {
        assert_eq!(captured_positions(&[B, A, B, A, A], Face::Orange), vec![0, 2]);
    }

    #[test]
    fn test_blank_top_or_no_defenders() {
        assert!(captured_positions(&[B, A], Face::Blank).is_empty());
        assert!(captured_positions(&[A, A], Face::Red).is_empty());
        assert!(captured_positions(&[], Face::Red).is_empty());
    }

    #[test]
    fn test_depth_caps_capture_count() {
        assert_eq!(captured_positions(&[B, B, B, A], Face::Red), vec![2]);
    }
}
