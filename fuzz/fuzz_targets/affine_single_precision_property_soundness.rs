#![no_main]

use impact_affine::affine::fuzzing::{
    AffineFuzzInput, fuzz_test_single_precision_property_soundness,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: AffineFuzzInput| {
    fuzz_test_single_precision_property_soundness(input);
});
