//! Connected-component labeling over a boolean grid
//!
//! 4-connectivity (edge neighbours only). Labels are assigned in raster scan
//! order starting at 1; 0 marks background.

/// Result of labeling a grid
#[derive(Debug, Clone)]
pub struct Components {
    /// Label per cell, row-major; 0 = background
    pub labels: Vec<u32>,
    /// Pixel count per label; index 0 is always 0
    pub sizes: Vec<usize>,
}

impl Components {
    /// Number of components found
    pub fn count(&self) -> usize {
        self.sizes.len() - 1
    }

    /// Label of the biggest component, ties going to the first in scan order
    pub fn largest(&self) -> Option<u32> {
        let mut best: Option<(u32, usize)> = None;
        for (label, &size) in self.sizes.iter().enumerate().skip(1) {
            if best.is_none_or(|(_, s)| size > s) {
                best = Some((label as u32, size));
            }
        }
        best.map(|(label, _)| label)
    }
}

/// Label the `true` cells of a `width x height` row-major grid
pub fn label(cells: &[bool], width: usize, height: usize) -> Components {
    debug_assert_eq!(cells.len(), width * height);

    let mut labels = vec![0u32; cells.len()];
    let mut sizes = vec![0usize];
    let mut stack: Vec<usize> = Vec::new();

    for start in 0..cells.len() {
        if !cells[start] || labels[start] != 0 {
            continue;
        }

        let id = sizes.len() as u32;
        let mut size = 0;
        labels[start] = id;
        stack.push(start);

        while let Some(idx) = stack.pop() {
            size += 1;
            let x = idx % width;
            let y = idx / width;

            let mut visit = |n: usize| {
                if cells[n] && labels[n] == 0 {
                    labels[n] = id;
                    stack.push(n);
                }
            };
            if x > 0 {
                visit(idx - 1);
            }
            if x + 1 < width {
                visit(idx + 1);
            }
            if y > 0 {
                visit(idx - width);
            }
            if y + 1 < height {
                visit(idx + width);
            }
        }

        sizes.push(size);
    }

    Components { labels, sizes }
}

/// Keep only the largest 4-connected region of `cells`
///
/// Returns the filtered grid and the size of the kept region (0 if the input
/// had no `true` cells).
pub fn keep_largest(cells: &[bool], width: usize, height: usize) -> (Vec<bool>, usize) {
    let components = label(cells, width, height);
    log::debug!("Labeled {} candidate regions", components.count());

    match components.largest() {
        Some(keep) => {
            let size = components.sizes[keep as usize];
            let kept = components.labels.iter().map(|&l| l == keep).collect();
            (kept, size)
        }
        None => (vec![false; cells.len()], 0),
    }
}
