//! Sorting algorithms under measurement.
//!
//! All sorts are in-place over `Ord` slices. The quicksorts use a Lomuto
//! partition with the last element as pivot and recurse into the smaller half
//! only, so stack depth stays logarithmic.

use clap::ValueEnum;

/// Ranges at or below this length are finished with insertion sort by
/// [`better_quick_sort`] (a `high - low <= 33` test over inclusive bounds).
pub const INSERTION_CUTOFF: usize = 34;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum SortAlgorithm {
    Bubble,
    Selection,
    Insertion,
    Quick,
    BetterQuick,
    Std,
}

impl SortAlgorithm {
    pub const ALL: [SortAlgorithm; 6] = [
        SortAlgorithm::Std,
        SortAlgorithm::Quick,
        SortAlgorithm::BetterQuick,
        SortAlgorithm::Bubble,
        SortAlgorithm::Selection,
        SortAlgorithm::Insertion,
    ];

    /// Series name written to the output CSV (file stem).
    pub fn series_name(self) -> &'static str {
        match self {
            SortAlgorithm::Bubble => "Bubble",
            SortAlgorithm::Selection => "Selection",
            SortAlgorithm::Insertion => "Insertion",
            SortAlgorithm::Quick => "Quick",
            SortAlgorithm::BetterQuick => "Better Quick",
            SortAlgorithm::Std => "Std",
        }
    }

    pub fn sort<T: Ord>(self, v: &mut [T]) {
        match self {
            SortAlgorithm::Bubble => bubble_sort(v),
            SortAlgorithm::Selection => selection_sort(v),
            SortAlgorithm::Insertion => insertion_sort(v),
            SortAlgorithm::Quick => quick_sort(v),
            SortAlgorithm::BetterQuick => better_quick_sort(v),
            SortAlgorithm::Std => v.sort_unstable(),
        }
    }
}

/// Bubble the smallest remaining element down from the end on each pass.
pub fn bubble_sort<T: Ord>(v: &mut [T]) {
    let n = v.len();
    for i in 1..n {
        for j in (i..n).rev() {
            if v[j] < v[j - 1] {
                v.swap(j, j - 1);
            }
        }
    }
}

pub fn selection_sort<T: Ord>(v: &mut [T]) {
    let n = v.len();
    for i in 0..n.saturating_sub(1) {
        let mut min = i;
        for j in (i + 1)..n {
            if v[j] < v[min] {
                min = j;
            }
        }
        v.swap(i, min);
    }
}

pub fn insertion_sort<T: Ord>(v: &mut [T]) {
    for i in 1..v.len() {
        let mut j = i;
        while j > 0 && v[j] < v[j - 1] {
            v.swap(j, j - 1);
            j -= 1;
        }
    }
}

pub fn quick_sort<T: Ord>(v: &mut [T]) {
    quick_sort_with_cutoff(v, 1);
}

pub fn better_quick_sort<T: Ord>(v: &mut [T]) {
    quick_sort_with_cutoff(v, INSERTION_CUTOFF);
}

fn quick_sort_with_cutoff<T: Ord>(v: &mut [T], cutoff: usize) {
    let mut v = v;
    while v.len() > 1 {
        if v.len() <= cutoff {
            insertion_sort(v);
            return;
        }
        let p = lomuto_partition(v);
        let (left, right) = std::mem::take(&mut v).split_at_mut(p);
        let right = &mut right[1..];
        if left.len() < right.len() {
            quick_sort_with_cutoff(left, cutoff);
            v = right;
        } else {
            quick_sort_with_cutoff(right, cutoff);
            v = left;
        }
    }
}

/// Partition around the last element; returns the pivot's final index.
fn lomuto_partition<T: Ord>(v: &mut [T]) -> usize {
    let last = v.len() - 1;
    let mut i = 0;
    for j in 0..last {
        if v[j] <= v[last] {
            v.swap(i, j);
            i += 1;
        }
    }
    v.swap(i, last);
    i
}
