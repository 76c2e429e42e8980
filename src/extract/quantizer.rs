use std::{ cmp::Reverse, collections::HashMap };

use crate::color::Rgb;

const QUANTIZE_WORD_WIDTH: u32 = 5;
const QUANTIZE_SHIFT: u32 = 8 - QUANTIZE_WORD_WIDTH;
const QUANTIZE_WORD_MAX: u8 = (1 << QUANTIZE_WORD_WIDTH) - 1;
const FRACT_BY_POPULATION: f32 = 0.75;

type Cell = (u8, u8, u8);

/// Modified median cut quantizer. Boxes are first split by pixel population,
/// then by population times volume so large sparse regions get their own
/// color too.
pub struct MedianCutQuantizer {
    max_colors: usize,
}

struct Vbox {
    start: usize,
    end: usize,
    population: u32,
    red_range: (u8, u8),
    green_range: (u8, u8),
    blue_range: (u8, u8),
}

enum Component {
    Red,
    Green,
    Blue,
}

impl MedianCutQuantizer {
    pub fn new(max_colors: usize) -> Self {
        Self {
            max_colors,
        }
    }

    /// Returns at most `max_colors` colors ordered by population times volume,
    /// largest first. Empty input gives an empty palette.
    pub fn quantize<I>(&self, pixels: I) -> Vec<Rgb>
    where I: IntoIterator<Item = Rgb> {
        let mut hist: HashMap<Cell, u32> = HashMap::new();
        for pixel in pixels {
            *hist.entry(quantize(pixel)).or_insert(0) += 1;
        }
        if hist.is_empty() || self.max_colors == 0 {
            return Vec::new();
        }

        let mut colors = hist.into_iter().collect::<Vec<_>>();
        colors.sort_by_key(|(cell, _)| pack(*cell));

        let mut boxes = vec![Vbox::new(&colors, 0, colors.len())];

        let by_population = ((self.max_colors as f32) * FRACT_BY_POPULATION).ceil() as usize;
        split_boxes(&mut colors, &mut boxes, by_population, |vbox| vbox.population as u64);
        split_boxes(&mut colors, &mut boxes, self.max_colors, |vbox| vbox.population as u64 * vbox.volume());

        boxes.sort_by_key(|vbox| Reverse(vbox.population as u64 * vbox.volume()));
        boxes.iter().map(|vbox| vbox.average_color(&colors)).collect()
    }
}

fn split_boxes<F>(colors: &mut [(Cell, u32)], boxes: &mut Vec<Vbox>, target: usize, priority: F)
where F: Fn(&Vbox) -> u64 {
    while boxes.len() < target {
        let next = boxes.iter()
                        .enumerate()
                        .filter(|(_, vbox)| vbox.can_split())
                        .max_by_key(|(_, vbox)| priority(vbox))
                        .map(|(idx, _)| idx);

        // nothing left to split, every box holds a single cell
        let idx = match next {
            Some(idx) => idx,
            None => return,
        };

        let vbox = boxes.swap_remove(idx);
        let (left, right) = vbox.split(colors);
        boxes.push(left);
        boxes.push(right);
    }
}

impl Vbox {
    fn new(colors: &[(Cell, u32)], start: usize, end: usize) -> Self {
        let mut population = 0;
        // min, max
        let (mut min_red, mut max_red) = (QUANTIZE_WORD_MAX, 0);
        let (mut min_green, mut max_green) = (QUANTIZE_WORD_MAX, 0);
        let (mut min_blue, mut max_blue) = (QUANTIZE_WORD_MAX, 0);

        for ((r, g, b), count) in colors[start..end].iter().copied() {
            population += count;

            min_red = min_red.min(r);
            max_red = max_red.max(r);
            min_green = min_green.min(g);
            max_green = max_green.max(g);
            min_blue = min_blue.min(b);
            max_blue = max_blue.max(b);
        }

        Self {
            start,
            end,
            population,
            red_range: (min_red, max_red),
            green_range: (min_green, max_green),
            blue_range: (min_blue, max_blue),
        }
    }

    fn volume(&self) -> u64 {
        (self.red_range.1 - self.red_range.0 + 1) as u64
            * (self.green_range.1 - self.green_range.0 + 1) as u64
            * (self.blue_range.1 - self.blue_range.0 + 1) as u64
    }

    fn can_split(&self) -> bool {
        self.end - self.start > 1
    }

    fn split(self, colors: &mut [(Cell, u32)]) -> (Vbox, Vbox) {
        let slice = &mut colors[self.start..self.end];
        match self.longest_dimension() {
            Component::Red => slice.sort_by_key(|((r, _, _), _)| *r),
            Component::Green => slice.sort_by_key(|((_, g, _), _)| *g),
            Component::Blue => slice.sort_by_key(|((_, _, b), _)| *b),
        }

        let split_point = self.start + find_split_point(slice, self.population);

        (Vbox::new(colors, self.start, split_point), Vbox::new(colors, split_point, self.end))
    }

    fn longest_dimension(&self) -> Component {
        let red_length = self.red_range.1 - self.red_range.0;
        let green_length = self.green_range.1 - self.green_range.0;
        let blue_length = self.blue_range.1 - self.blue_range.0;

        if red_length >= green_length && red_length >= blue_length {
            Component::Red
        } else if green_length >= blue_length {
            Component::Green
        } else {
            Component::Blue
        }
    }

    fn average_color(&self, colors: &[(Cell, u32)]) -> Rgb {
        let (mut red_sum, mut green_sum, mut blue_sum) = (0.0, 0.0, 0.0);
        for ((r, g, b), count) in colors[self.start..self.end].iter().copied() {
            let weight = count as f64;
            red_sum += weight * cell_center(r);
            green_sum += weight * cell_center(g);
            blue_sum += weight * cell_center(b);
        }

        let population = self.population as f64;
        Rgb::new(
            (red_sum / population).min(255.0) as u8,
            (green_sum / population).min(255.0) as u8,
            (blue_sum / population).min(255.0) as u8,
        )
    }
}

// First index whose running population reaches half the box, never 0 so both
// halves keep at least one cell.
fn find_split_point(colors: &[(Cell, u32)], population: u32) -> usize {
    let midpoint = population / 2;
    let mut pop = 0;

    for (i, (_, count)) in colors.iter().enumerate() {
        pop += count;

        if pop >= midpoint {
            return i.max(1).min(colors.len() - 1);
        }
    }

    colors.len() - 1
}

fn quantize(rgb: Rgb) -> Cell {
    (rgb.r >> QUANTIZE_SHIFT, rgb.g >> QUANTIZE_SHIFT, rgb.b >> QUANTIZE_SHIFT)
}

fn cell_center(value: u8) -> f64 {
    (value as f64 + 0.5) * (1 << QUANTIZE_SHIFT) as f64
}

fn pack((r, g, b): Cell) -> u32 {
    ((r as u32) << (QUANTIZE_WORD_WIDTH + QUANTIZE_WORD_WIDTH)) | ((g as u32) << QUANTIZE_WORD_WIDTH) | b as u32
}
