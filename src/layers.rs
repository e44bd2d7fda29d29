//! Layered storage for neuron units.
//!
//! All units live in one contiguous arena. Each layer is a span of that
//! arena, so a unit is addressed by `(layer, position)` and traversal order is
//! just the order of the spans.
use crate::neuron::Neuron;
use std::ops::Range;

#[derive(Debug, Clone, Default)]
pub struct LayerArena {
    units: Vec<Neuron>,
    spans: Vec<Range<usize>>,
}

impl LayerArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer on top of the existing ones and return its index.
    pub fn push_layer<I: IntoIterator<Item = Neuron>>(&mut self, units: I) -> usize {
        let start = self.units.len();
        self.units.extend(units);
        self.spans.push(start..self.units.len());
        self.spans.len() - 1
    }

    /// Number of layers.
    pub fn depth(&self) -> usize {
        self.spans.len()
    }

    /// Number of units in `layer`.
    pub fn layer_len(&self, layer: usize) -> usize {
        self.spans[layer].len()
    }

    pub fn layer(&self, layer: usize) -> &[Neuron] {
        &self.units[self.spans[layer].clone()]
    }

    pub fn layer_mut(&mut self, layer: usize) -> &mut [Neuron] {
        let span = self.spans[layer].clone();
        &mut self.units[span]
    }

    pub fn unit(&self, layer: usize, position: usize) -> Option<&Neuron> {
        self.spans
            .get(layer)
            .and_then(|span| self.units[span.clone()].get(position))
    }

    /// Latest outputs of every unit in `layer`, in position order.
    pub fn outputs(&self, layer: usize) -> Vec<f64> {
        self.layer(layer).iter().map(Neuron::output).collect()
    }

    /// Mutable view of `layer` together with a read-only view of the layer
    /// above it. Panics if `layer` is the top layer.
    pub fn split_with_next(&mut self, layer: usize) -> (&mut [Neuron], &[Neuron]) {
        let current = self.spans[layer].clone();
        let next = self.spans[layer + 1].clone();
        let (below, above) = self.units.split_at_mut(current.end);
        let next_len = next.end - next.start;
        (&mut below[current.start..], &above[..next_len])
    }

    /// Every unit with its `(layer, position)` address, bottom layer first.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &Neuron)> + '_ {
        self.spans.iter().enumerate().flat_map(move |(layer, span)| {
            self.units[span.clone()]
                .iter()
                .enumerate()
                .map(move |(position, unit)| ((layer, position), unit))
        })
    }

    /// Total number of units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activations::Activation;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn arena() -> LayerArena {
        let mut rng = StdRng::seed_from_u64(0);
        let mut arena = LayerArena::new();
        arena.push_layer((0..3).map(|_| Neuron::new(Activation::bipolar_sigmoid(), 2, 0, &mut rng)));
        arena.push_layer((0..3).map(|_| Neuron::new(Activation::bipolar_sigmoid(), 3, 1, &mut rng)));
        arena.push_layer((0..1).map(|_| Neuron::new(Activation::linear(), 3, 2, &mut rng)));
        arena
    }

    #[test]
    fn spans_address_layers() {
        let arena = arena();
        assert_eq!(arena.depth(), 3);
        assert_eq!(arena.len(), 7);
        assert_eq!(arena.layer_len(0), 3);
        assert_eq!(arena.layer_len(2), 1);
        assert!(arena.layer(1).iter().all(|n| n.layer() == 1));
        assert!(arena.unit(2, 0).is_some());
        assert!(arena.unit(2, 1).is_none());
        assert!(arena.unit(3, 0).is_none());
    }

    #[test]
    fn split_with_next_returns_adjacent_layers() {
        let mut arena = arena();
        let (current, next) = arena.split_with_next(1);
        assert_eq!(current.len(), 3);
        assert_eq!(next.len(), 1);
        assert!(current.iter().all(|n| n.layer() == 1));
        assert_eq!(next[0].layer(), 2);

        let (current, next) = arena.split_with_next(0);
        assert!(current.iter().all(|n| n.layer() == 0));
        assert!(next.iter().all(|n| n.layer() == 1));
    }

    #[test]
    fn iter_visits_in_layer_order() {
        let arena = arena();
        let addresses: Vec<(usize, usize)> = arena.iter().map(|(addr, _)| addr).collect();
        assert_eq!(addresses.first(), Some(&(0, 0)));
        assert_eq!(addresses[3], (1, 0));
        assert_eq!(addresses.last(), Some(&(2, 0)));
    }
}
