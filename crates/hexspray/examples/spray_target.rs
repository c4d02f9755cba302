//! Minimal target program to debug with hexspray.
//!
//! Gives the debugger something to chew on: a `main` symbol to break at,
//! short functions to step through, and a static buffer whose address is
//! worth examining with the type spray.

static GREETING: &[u8; 32] = b"hello from the spray target!!!..";

fn main()
{
    println!("Spray Target Starting...");
    println!("PID: {}", std::process::id());
    println!("GREETING at {:p}", GREETING.as_ptr());

    let mut counter = 0u64;
    let mut sum = 0i64;

    loop {
        counter += 1;
        sum = accumulate(counter, sum);

        if counter % 50 == 0 {
            println!("Iteration: {}, Sum: {}", counter, sum);
        }

        std::thread::sleep(std::time::Duration::from_millis(200));
    }
}

/// Fold one value into the running sum, alternating sign.
fn accumulate(value: u64, sum: i64) -> i64
{
    let signed = value as i64;
    if value % 2 == 0 { sum + signed } else { sum - signed }
}
