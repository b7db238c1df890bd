use std::hint::black_box;
use criterion::{criterion_group, criterion_main, Criterion};
use exg_psd::{
    compute_epochs_psd, compute_raw_psd, make_fixed_length_epochs, psd_welch_1d, MeasInfo,
    PsdConfig, RawArray, FIFFV_EEG_CH,
};
use ndarray::Array2;

const SFREQ: f64 = 256.0;

/// 32 channels, 60 s of deterministic broadband signal.
fn raw_32ch() -> RawArray {
    let names: Vec<String> = (0..32).map(|i| format!("EEG {i:03}")).collect();
    let info = MeasInfo::new(&names, SFREQ, FIFFV_EEG_CH);
    let data = Array2::from_shape_fn((32, 60 * 256), |(c, t)| {
        let x = t as f64 / SFREQ;
        (2.0 * std::f64::consts::PI * (c as f64 + 1.0) * x).sin() + ((c * 31 + t * 17) as f64).sin()
    });
    RawArray::new(data, info).unwrap()
}

fn bench_welch_1d(c: &mut Criterion) {
    let raw = raw_32ch();
    let row = raw.data.row(0);
    c.bench_function("psd_welch_1d [15360 samples, n_fft 256]", |b| {
        b.iter(|| {
            let (psd, _) = psd_welch_1d(black_box(row), SFREQ, 256, 0).unwrap();
            black_box(psd[0])
        })
    });
}

fn bench_raw_psd(c: &mut Criterion) {
    let raw = raw_32ch();
    for n_jobs in [1, 4] {
        let cfg = PsdConfig { fmax: 40.0, n_jobs, ..PsdConfig::raw_default() };
        c.bench_function(&format!("compute_raw_psd [32×15360] n_jobs={n_jobs}"), |b| {
            b.iter(|| {
                let (psd, _) =
                    compute_raw_psd(&raw, 0.0, f64::INFINITY, None, false, black_box(&cfg)).unwrap();
                black_box(psd[[0, 0]])
            })
        });
    }
}

fn bench_epochs_psd(c: &mut Criterion) {
    let epochs = make_fixed_length_epochs(&raw_32ch(), 2.0).unwrap();
    for n_jobs in [1, 4] {
        let cfg = PsdConfig { fmax: 40.0, n_jobs, ..PsdConfig::default() };
        c.bench_function(&format!("compute_epochs_psd [30×32×512] n_jobs={n_jobs}"), |b| {
            b.iter(|| {
                let (psds, _) = compute_epochs_psd(&epochs, None, black_box(&cfg)).unwrap();
                black_box(psds[[0, 0, 0]])
            })
        });
    }
}

criterion_group!(benches, bench_welch_1d, bench_raw_psd, bench_epochs_psd);
criterion_main!(benches);
