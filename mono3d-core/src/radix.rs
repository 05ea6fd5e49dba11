//! Stable LSD radix sort over fixed-width keys with a parallel `u32` value array
//!
//! Keys are sorted 8 bits at a time, least significant digit first. Each
//! pass scatters from one buffer into the other, so the caller supplies a
//! temp buffer per array and reads the result from whichever buffer the
//! returned [`SortBuffer`] names.

const RADIX_BITS: u32 = 8;
const HIST_SIZE: usize = 1 << RADIX_BITS;
const DIGIT_MASK: u64 = (HIST_SIZE - 1) as u64;
const MAX_PASSES: usize = 8;

type Histograms = [[u32; HIST_SIZE]; MAX_PASSES];

/// Which of the two buffers holds the sorted result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBuffer {
    /// The `keys` / `values` buffers passed in
    Primary = 0,
    /// The `keys_temp` / `values_temp` buffers
    Temp = 1,
}

impl SortBuffer {
    /// Pick the buffer holding the sorted output
    pub fn select<'a, T>(self, primary: &'a [T], temp: &'a [T]) -> &'a [T] {
        match self {
            SortBuffer::Primary => primary,
            SortBuffer::Temp => temp,
        }
    }

    fn after_pass(pass: usize) -> Self {
        if pass & 1 == 0 {
            SortBuffer::Temp
        } else {
            SortBuffer::Primary
        }
    }
}

/// Unsigned integer keys that sort in natural order
pub trait RadixKey: Copy {
    /// Number of 8-bit digits in the key
    const PASSES: usize;

    fn bits(self) -> u64;
}

impl RadixKey for u32 {
    const PASSES: usize = 4;

    fn bits(self) -> u64 {
        self as u64
    }
}

impl RadixKey for u64 {
    const PASSES: usize = 8;

    fn bits(self) -> u64 {
        self
    }
}

/// Map float bits to an unsigned key whose natural order is the float's numeric order.
///
/// Negative floats get every bit flipped, positive floats only the sign bit.
#[inline]
pub fn float_flip(bits: u32) -> u32 {
    let mask = ((bits >> 31) as i32).wrapping_neg() as u32 | 0x8000_0000;
    bits ^ mask
}

/// Inverse of [`float_flip`]
#[inline]
pub fn inv_float_flip(bits: u32) -> u32 {
    let mask = (bits >> 31).wrapping_sub(1) | 0x8000_0000;
    bits ^ mask
}

#[inline]
fn digit(bits: u64, pass: usize) -> usize {
    ((bits >> (pass as u32 * RADIX_BITS)) & DIGIT_MASK) as usize
}

/// Count every digit position in a single scan
fn build_histograms<S: Copy>(keys: &[S], passes: usize, key_bits: impl Fn(S) -> u64) -> Histograms {
    let mut hist = [[0u32; HIST_SIZE]; MAX_PASSES];
    for &key in keys {
        let bits = key_bits(key);
        for (pass, counts) in hist.iter_mut().enumerate().take(passes) {
            counts[digit(bits, pass)] += 1;
        }
    }
    hist
}

/// Turn counts into exclusive prefix sums (bucket start offsets)
fn sum_histograms(hist: &mut Histograms, passes: usize) {
    for counts in hist.iter_mut().take(passes) {
        let mut sum = 0u32;
        for slot in counts.iter_mut() {
            let count = *slot;
            *slot = sum;
            sum += count;
        }
    }
}

/// One stable scatter pass. `route` yields the bucket for a key and the
/// value to store in the output buffer.
fn scatter<S: Copy>(
    offsets: &mut [u32; HIST_SIZE],
    keys_in: &[S],
    keys_out: &mut [S],
    mut values: Option<(&[u32], &mut [u32])>,
    route: impl Fn(S) -> (usize, S),
) {
    for (i, &key) in keys_in.iter().enumerate() {
        let (bucket, stored) = route(key);
        let index = offsets[bucket] as usize;
        offsets[bucket] += 1;
        keys_out[index] = stored;
        if let Some((values_in, values_out)) = values.as_mut() {
            values_out[index] = values_in[i];
        }
    }
}

/// Run a pass alternating between the primary and temp buffers
fn run_pass<S: Copy>(
    pass: usize,
    offsets: &mut [u32; HIST_SIZE],
    keys: &mut [S],
    keys_temp: &mut [S],
    values: Option<(&mut [u32], &mut [u32])>,
    route: impl Fn(S) -> (usize, S),
) {
    let forward = pass & 1 == 0;
    let values = values.map(|(primary, temp)| {
        if forward {
            (&*primary, temp)
        } else {
            (&*temp, primary)
        }
    });
    if forward {
        scatter(offsets, keys, keys_temp, values, route);
    } else {
        scatter(offsets, keys_temp, keys, values, route);
    }
}

fn sort_integer<K: RadixKey>(
    keys: &mut [K],
    keys_temp: &mut [K],
    mut values: Option<(&mut [u32], &mut [u32])>,
) -> SortBuffer {
    let size = keys.len();
    let keys_temp = &mut keys_temp[..size];

    let mut hist = build_histograms(keys, K::PASSES, K::bits);
    sum_histograms(&mut hist, K::PASSES);

    let mut out = SortBuffer::Primary;
    for pass in 0..K::PASSES {
        let values = values
            .as_mut()
            .map(|(v, t)| (&mut v[..size], &mut t[..size]));
        run_pass(pass, &mut hist[pass], keys, keys_temp, values, |key| {
            (digit(key.bits(), pass), key)
        });
        out = SortBuffer::after_pass(pass);
    }
    out
}

/// Sort `u32` keys ascending, carrying `values` along. Stable.
///
/// `keys_temp`, `values` and `values_temp` must hold at least `keys.len()`
/// elements.
pub fn radix_sort_u32(
    keys: &mut [u32],
    keys_temp: &mut [u32],
    values: &mut [u32],
    values_temp: &mut [u32],
) -> SortBuffer {
    sort_integer(keys, keys_temp, Some((values, values_temp)))
}

/// Sort `u64` keys ascending, carrying `values` along. Stable.
pub fn radix_sort_u64(
    keys: &mut [u64],
    keys_temp: &mut [u64],
    values: &mut [u32],
    values_temp: &mut [u32],
) -> SortBuffer {
    sort_integer(keys, keys_temp, Some((values, values_temp)))
}

/// Sort `u32` keys ascending with no payload
pub fn radix_sort_keys_u32(keys: &mut [u32], keys_temp: &mut [u32]) -> SortBuffer {
    sort_integer(keys, keys_temp, None)
}

/// Sort `f32` keys by numeric value, carrying `values` along. Stable.
///
/// Ordering matches [`f32::total_cmp`]: `-inf < -0.0 < +0.0 < +inf`.
/// The flip is applied on the first pass and undone on the last, so the
/// sorted keys are bit-identical to the inputs.
pub fn radix_sort_f32(
    keys: &mut [f32],
    keys_temp: &mut [f32],
    values: &mut [u32],
    values_temp: &mut [u32],
) -> SortBuffer {
    const PASSES: usize = 4;
    const LAST: usize = PASSES - 1;

    let size = keys.len();
    let keys_temp = &mut keys_temp[..size];
    let values = &mut values[..size];
    let values_temp = &mut values_temp[..size];

    let mut hist = build_histograms(keys, PASSES, |key: f32| {
        float_flip(key.to_bits()) as u64
    });
    sum_histograms(&mut hist, PASSES);

    for pass in 0..PASSES {
        let offsets = &mut hist[pass];
        let values = Some((&mut *values, &mut *values_temp));
        match pass {
            0 => run_pass(pass, offsets, keys, keys_temp, values, |key: f32| {
                let bits = float_flip(key.to_bits());
                (digit(bits as u64, pass), f32::from_bits(bits))
            }),
            LAST => run_pass(pass, offsets, keys, keys_temp, values, |key: f32| {
                let bits = key.to_bits();
                (digit(bits as u64, pass), f32::from_bits(inv_float_flip(bits)))
            }),
            _ => run_pass(pass, offsets, keys, keys_temp, values, |key: f32| {
                (digit(key.to_bits() as u64, pass), key)
            }),
        }
    }
    SortBuffer::after_pass(LAST)
}
