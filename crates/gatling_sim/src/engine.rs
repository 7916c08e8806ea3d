//! The cycle engine: one synchronous evaluation of every gate.

use gatling_netlist::NetlistImage;

use crate::state::StepView;

/// Evaluates every gate in the image exactly once.
///
/// NAND gates compute `!(old[in1] & old[in2])`, OR gates `old[in1] |
/// old[in2]`, reading exclusively from the previous step's buffer and
/// writing exclusively to this step's. The double buffering makes gate
/// order irrelevant, standing in for the parallel evaluation real hardware
/// would do.
pub fn step(image: &NetlistImage, view: &mut StepView<'_>) {
    for gate in &image.nands {
        let value = !(view.old(gate.in1) && view.old(gate.in2));
        view.set_new(gate.out, value);
    }
    for gate in &image.ors {
        let value = view.old(gate.in1) || view.old(gate.in2);
        view.set_new(gate.out, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::WireStateStore;
    use gatling_netlist::{Gate, Wire};

    fn w(i: u32) -> Wire {
        Wire::from_raw(i)
    }

    /// Steps once with held input wires, returning nothing; read results
    /// from the store afterwards.
    fn run_step(image: &NetlistImage, store: &mut WireStateStore, held: &[(Wire, bool)]) {
        for &(wire, value) in held {
            store.set(wire, value);
        }
        let mut view = store.view();
        step(image, &mut view);
        store.advance();
    }

    #[test]
    fn nand_with_grounded_input_is_high() {
        // out = NAND(in, 0) must read 1 after one step regardless of the
        // randomized initial state.
        let image = NetlistImage::from_gates(vec![Gate::new(w(0), w(1), w(2))], vec![]);
        for seed in 0..8 {
            let mut store = WireStateStore::new(3, seed);
            for in1 in [false, true] {
                run_step(&image, &mut store, &[(w(0), in1), (w(1), false)]);
                assert!(store.get(w(2)), "seed {seed}, in1 {in1}");
            }
        }
    }

    #[test]
    fn nand_truth_table() {
        let image = NetlistImage::from_gates(vec![Gate::new(w(0), w(1), w(2))], vec![]);
        for (a, b, expect) in [
            (false, false, true),
            (false, true, true),
            (true, false, true),
            (true, true, false),
        ] {
            let mut store = WireStateStore::new(3, 99);
            run_step(&image, &mut store, &[(w(0), a), (w(1), b)]);
            assert_eq!(store.get(w(2)), expect, "a={a} b={b}");
        }
    }

    #[test]
    fn or_truth_table() {
        let image = NetlistImage::from_gates(vec![], vec![Gate::new(w(0), w(1), w(2))]);
        for (a, b, expect) in [
            (false, false, false),
            (false, true, true),
            (true, false, true),
            (true, true, true),
        ] {
            let mut store = WireStateStore::new(3, 5);
            run_step(&image, &mut store, &[(w(0), a), (w(1), b)]);
            assert_eq!(store.get(w(2)), expect, "a={a} b={b}");
        }
    }

    #[test]
    fn gates_read_only_old_values() {
        // Chain: w2 = NAND(w0, w1), w3 = NAND(w2, w2). The second gate must
        // see the PREVIOUS w2, not the one just computed, so the chain
        // takes two steps to settle.
        let image = NetlistImage::from_gates(
            vec![Gate::new(w(0), w(1), w(2)), Gate::new(w(2), w(2), w(3))],
            vec![],
        );
        let mut store = WireStateStore::new(4, 11);
        // Force old w2 high so step 1's second gate computes NAND(1,1)=0.
        store.set(w(2), true);
        run_step(&image, &mut store, &[(w(0), true), (w(1), true)]);
        assert!(!store.get(w(2))); // NAND(1,1)
        assert!(!store.get(w(3))); // NAND(old w2=1, old w2=1)

        run_step(&image, &mut store, &[(w(0), true), (w(1), true)]);
        assert!(store.get(w(3))); // now sees w2=0 from step 1
    }

    #[test]
    fn evaluation_order_is_irrelevant() {
        // Same netlist with gate arrays in reverse order settles identically.
        let forward = NetlistImage::from_gates(
            vec![Gate::new(w(0), w(1), w(2)), Gate::new(w(2), w(2), w(3))],
            vec![],
        );
        let backward = NetlistImage::from_gates(
            vec![Gate::new(w(2), w(2), w(3)), Gate::new(w(0), w(1), w(2))],
            vec![],
        );
        let mut a = WireStateStore::new(4, 17);
        let mut b = WireStateStore::new(4, 17);
        for _ in 0..4 {
            run_step(&forward, &mut a, &[(w(0), true), (w(1), false)]);
            run_step(&backward, &mut b, &[(w(0), true), (w(1), false)]);
        }
        assert_eq!(a.get(w(2)), b.get(w(2)));
        assert_eq!(a.get(w(3)), b.get(w(3)));
    }

    #[test]
    fn sr_latch_holds_state() {
        // Cross-coupled NANDs: q = NAND(s, qbar), qbar = NAND(r, q).
        // Active-low inputs: s=0 sets, r=0 resets, both 1 holds.
        let image = NetlistImage::from_gates(
            vec![Gate::new(w(0), w(3), w(2)), Gate::new(w(1), w(2), w(3))],
            vec![],
        );
        let mut store = WireStateStore::new(4, 23);

        // Set: s=0, r=1 for a few steps to settle.
        for _ in 0..4 {
            run_step(&image, &mut store, &[(w(0), false), (w(1), true)]);
        }
        assert!(store.get(w(2)));
        assert!(!store.get(w(3)));

        // Hold: s=1, r=1 keeps q.
        for _ in 0..4 {
            run_step(&image, &mut store, &[(w(0), true), (w(1), true)]);
        }
        assert!(store.get(w(2)));
        assert!(!store.get(w(3)));

        // Reset: r=0 flips it.
        for _ in 0..4 {
            run_step(&image, &mut store, &[(w(0), true), (w(1), false)]);
        }
        assert!(!store.get(w(2)));
        assert!(store.get(w(3)));
    }
}
