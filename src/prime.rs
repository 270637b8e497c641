//! Probabilistic primality testing.

use num_bigint::{BigUint, RandBigInt};
use num_integer::{Integer, Roots};
use num_traits::{One, ToPrimitive, Zero};
use rand_core::CryptoRngCore;

use crate::math::{jacobi, mod_pow, trailing_zeros};

/// Number of Miller-Rabin rounds used when generating key primes.
///
/// A random composite survives all rounds with probability at most `4^-32`.
pub const PRIMALITY_ROUNDS: usize = 32;

const PRIMES_A: u64 = 3 * 5 * 7 * 11 * 13 * 17 * 19 * 23 * 37;
const PRIMES_B: u64 = 29 * 31 * 41 * 43 * 47 * 53;

/// Records the primes < 64.
const PRIME_BIT_MASK: u64 = 1 << 2
    | 1 << 3
    | 1 << 5
    | 1 << 7
    | 1 << 11
    | 1 << 13
    | 1 << 17
    | 1 << 19
    | 1 << 23
    | 1 << 29
    | 1 << 31
    | 1 << 37
    | 1 << 41
    | 1 << 43
    | 1 << 47
    | 1 << 53
    | 1 << 59
    | 1 << 61;

/// Reports whether `x` is probably prime, applying the Miller-Rabin test with
/// `reps + 1` bases as well as a Baillie-PSW test.
///
/// All but the last Miller-Rabin base are drawn from `rng`; the last one is
/// always 2, which together with the Lucas test makes up Baillie-PSW.
///
/// If `x` is prime, this returns true. If `x` is chosen randomly and is not
/// prime, it returns true with probability at most `4^-reps`.
/// Inputs below 64 are answered exactly.
///
/// See Menezes et al., Handbook of Applied Cryptography, 1997, pp. 145-149,
/// and FIPS 186-4 Appendix F for further discussion of the error probabilities.
///
/// Not suitable for judging primes that an adversary may have crafted to fool
/// the test.
pub fn probably_prime<R: CryptoRngCore + ?Sized>(rng: &mut R, x: &BigUint, reps: usize) -> bool {
    if x.is_zero() {
        return false;
    }

    if let Some(small) = x.to_u64() {
        if small < 64 {
            return (PRIME_BIT_MASK & (1 << small)) != 0;
        }
    }

    if x.is_even() {
        return false;
    }

    let r_a = (x % PRIMES_A).to_u64().unwrap_or_default();
    let r_b = (x % PRIMES_B).to_u64().unwrap_or_default();

    if r_a % 3 == 0
        || r_a % 5 == 0
        || r_a % 7 == 0
        || r_a % 11 == 0
        || r_a % 13 == 0
        || r_a % 17 == 0
        || r_a % 19 == 0
        || r_a % 23 == 0
        || r_a % 37 == 0
        || r_b % 29 == 0
        || r_b % 31 == 0
        || r_b % 41 == 0
        || r_b % 43 == 0
        || r_b % 47 == 0
        || r_b % 53 == 0
    {
        return false;
    }

    probably_prime_miller_rabin(rng, x, reps + 1, true) && probably_prime_lucas(x)
}

/// Reports whether `n` passes `reps` rounds of the Miller-Rabin primality
/// test, using bases drawn from `rng`.
/// If `force2` is true, the last round uses base 2.
/// See Handbook of Applied Cryptography, p. 139, Algorithm 4.24.
///
/// `n` must be odd and greater than 3 unless every round is forced to base 2.
fn probably_prime_miller_rabin<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    n: &BigUint,
    reps: usize,
    force2: bool,
) -> bool {
    let one = BigUint::one();
    let two = BigUint::from(2u32);

    let nm1 = n - &one;
    // nm1 = q << k
    let k = trailing_zeros(&nm1);
    let q = &nm1 >> k;

    let nm3 = &nm1 - &two;

    'next_random: for i in 0..reps {
        let x = if i == reps - 1 && force2 {
            two.clone()
        } else {
            rng.gen_biguint_below(&nm3) + &two
        };

        let mut y = mod_pow(&x, &q, n);
        if y.is_one() || y == nm1 {
            continue;
        }

        for _ in 1..k {
            y = (&y * &y) % n;
            if y == nm1 {
                continue 'next_random;
            }
            if y.is_one() {
                return false;
            }
        }
        return false;
    }

    true
}

/// Reports whether `n` passes the extra strong Lucas probable prime test,
/// using Baillie-OEIS parameter selection. Combined with a Miller-Rabin test
/// to base 2 this gives a Baillie-PSW test.
///
/// References:
///
/// Baillie and Wagstaff, "Lucas Pseudoprimes", Mathematics of Computation 35(152),
/// October 1980, pp. 1391-1417, especially page 1401.
///
/// Grantham, "Frobenius Pseudoprimes", Mathematics of Computation 70(234),
/// March 2000, pp. 873-891.
///
/// Baillie, "Extra strong Lucas pseudoprimes", OEIS A217719, <https://oeis.org/A217719>.
///
/// Crandall and Pomerance, Prime Numbers: A Computational Perspective, 2nd ed.
/// Springer, 2005.
fn probably_prime_lucas(n: &BigUint) -> bool {
    if n.is_zero() || n.is_one() {
        return false;
    }

    // Two is the only even prime.
    if n.is_even() {
        return n.to_u64() == Some(2);
    }

    // Baillie-OEIS "method C" for choosing D, P, Q: try increasing P >= 3
    // such that D = P^2 - 4 (so Q = 1) until Jacobi(D, n) = -1.
    // For a square n the search never succeeds, which is checked after a
    // few failed attempts.
    let mut p = 3u64;
    loop {
        if p > 10000 {
            // Believed impossible for non-square n.
            return false;
        }

        let d = BigUint::from(p * p - 4);
        match jacobi(&d, n) {
            Some(-1) => break,
            Some(0) => {
                // d = (p-2)(p+2) shares a factor with n, and p+2 is the only
                // candidate since p grows from 3.
                return n.to_u64() == Some(p + 2);
            }
            Some(_) => {}
            None => return false,
        }

        if p == 40 {
            let root = n.sqrt();
            if &(&root * &root) == n {
                return false;
            }
        }

        p += 1;
    }

    // n + 1 = 2^r * s, s odd
    let s_full = n + 1u32;
    let r = trailing_zeros(&s_full);
    let s = &s_full >> r;
    let nm2 = n - 2u32;
    let big_p = BigUint::from(p);

    // Compute V(s) and V(s+1) of the Lucas sequence V(0) = 2, V(1) = P,
    // V(k) = P V(k-1) - V(k-2), using
    //   V(2k)   = V(k)^2 - 2
    //   V(2k+1) = V(k) V(k+1) - P
    let mut vk = BigUint::from(2u32);
    let mut vk1 = big_p.clone();
    for i in (0..s.bits()).rev() {
        let bit = (&s >> i).is_odd();
        let cross = (&vk * &vk1 + n - &big_p) % n;
        if bit {
            vk = cross;
            vk1 = (&vk1 * &vk1 + &nm2) % n;
        } else {
            vk1 = cross;
            vk = (&vk * &vk + &nm2) % n;
        }
    }

    // V(s) = +-2 and U(s) = 0, with U(s) = 0 iff P V(s) = 2 V(s+1) (mod n).
    if vk.to_u64() == Some(2) || vk == nm2 {
        let lhs = (&vk * &big_p) % n;
        let rhs = (&vk1 << 1usize) % n;
        if lhs == rhs {
            return true;
        }
    }

    // V(2^t s) = 0 for some 0 <= t < r-1.
    for _ in 0..r.saturating_sub(1) {
        if vk.is_zero() {
            return true;
        }
        // 2 is a fixed point of V(2k) = V(k)^2 - 2.
        if vk.to_u64() == Some(2) {
            return false;
        }
        vk = (&vk * &vk + &nm2) % n;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::FromPrimitive;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

    const PRIMES: &[&str] = &[
        "2",
        "3",
        "5",
        "7",
        "11",

        "13756265695458089029",
        "13496181268022124907",
        "10953742525620032441",
        "17908251027575790097",

        // https://golang.org/issue/638
        "18699199384836356663",

        "98920366548084643601728869055592650835572950932266967461790948584315647051443",
        "94560208308847015747498523884063394671606671904944666360068158221458669711639",

        // http://primes.utm.edu/lists/small/small3.html
        "449417999055441493994709297093108513015373787049558499205492347871729927573118262811508386655998299074566974373711472560655026288668094291699357843464363003144674940345912431129144354948751003607115263071543163",
        "230975859993204150666423538988557839555560243929065415434980904258310530753006723857139742334640122533598517597674807096648905501653461687601339782814316124971547968912893214002992086353183070342498989426570593",
        "5521712099665906221540423207019333379125265462121169655563495403888449493493629943498064604536961775110765377745550377067893607246020694972959780839151452457728855382113555867743022746090187341871655890805971735385789993",
        "203956878356401977405765866929034577280193993314348263094772646453283062722701277632936616063144088173312372882677123879538709400158306567338328279154499698366071906766440037074217117805690872792848149112022286332144876183376326512083574821647933992961249917319836219304274280243803104015000563790123",

        // ECC primes: http://tools.ietf.org/html/draft-ladd-safecurves-02
        "3618502788666131106986593281521497120414687020801267626233049500247285301239", // Curve1174: 2^251-9
        "57896044618658097711785492504343953926634992332820282019728792003956564819949", // Curve25519: 2^255-19
        "9850501549098619803069760025035903451269934817616361666987073351061430442874302652853566563721228910201656997576599", // E-382: 2^382-105
        "42307582002575910332922579714097346549017899709713998034217522897561970639123926132812109468141778230245837569601494931472367", // Curve41417: 2^414-17
        "6864797660130609714981900799081393217269435300143305409394463459185543183397656052122559640661454554977296311391480858037121987999716643812574028291115057151", // E-521: 2^521-1
    ];

    const COMPOSITES: &[&str] = &[
        "0",
        "1",

        "21284175091214687912771199898307297748211672914763848041968395774954376176754",
        "6084766654921918907427900243509372380954290099172559290432744450051395395951",
        "84594350493221918389213352992032324280367711247940675652888030554255915464401",
        "82793403787388584738507275144194252681",

        // Arnault, "Rabin-Miller Primality Test: Composite Numbers Which Pass It",
        // Mathematics of Computation, 64(209) (January 1995), pp. 335-361.
        "1195068768795265792518361315725116351898245581", // strong pseudoprime to prime bases 2 through 29
        // strong pseudoprime to all prime bases up to 200
        "8038374574536394912570796143419421081388376882875581458374889175222974273765333652186502336163960045457915042023603208766569966760987284043965408232928738791850869166857328267761771029389697739470167082304286871099974399765441448453411558724506334092790222752962294149842306881685404326457534018329786111298960644845216191652872597534901",

        // Extra-strong Lucas pseudoprimes. https://oeis.org/A217719
        "989",
        "3239",
        "5777",
        "10877",
        "27971",
        "29681",
        "30739",
        "31631",
        "39059",
        "72389",
        "73919",
        "75077",
        "100127",
        "113573",
        "125249",
        "137549",
        "137801",
        "153931",
        "155819",
        "161027",
        "162133",
        "189419",
        "218321",
        "231703",
        "249331",
        "370229",
        "429479",
        "430127",
        "459191",
        "473891",
        "480689",
        "600059",
        "621781",
        "632249",
        "635627",

        "3673744903",
        "3281593591",
        "2385076987",
        "2738053141",
        "2009621503",
        "1502682721",
        "255866131",
        "117987841",
        "587861",

        "6368689",
        "8725753",
        "80579735209",
        "105919633",
    ];

    #[test]
    fn test_primes() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        for prime in PRIMES {
            let p = BigUint::parse_bytes(prime.as_bytes(), 10).unwrap();
            for i in [0, 1, 20] {
                assert!(
                    probably_prime(&mut rng, &p, i),
                    "{} is a prime ({})",
                    prime,
                    i,
                );
            }
        }
    }

    #[test]
    fn test_composites() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        for comp in COMPOSITES {
            let p = BigUint::parse_bytes(comp.as_bytes(), 10).unwrap();
            for i in [0, 1, 20] {
                assert!(
                    !probably_prime(&mut rng, &p, i),
                    "{} is a composite ({})",
                    comp,
                    i,
                );
            }
        }
    }

    #[test]
    fn test_small_values_exact() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let small_primes = [2u64, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61];
        for x in 0..64u64 {
            let n = BigUint::from_u64(x).unwrap();
            assert_eq!(
                probably_prime(&mut rng, &n, 0),
                small_primes.contains(&x),
                "{}",
                x
            );
        }
    }

    #[test]
    fn test_square_of_prime_is_rejected() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let p = BigUint::parse_bytes(b"18699199384836356663", 10).unwrap();
        assert!(!probably_prime(&mut rng, &(&p * &p), PRIMALITY_ROUNDS));
        assert!(!probably_prime_lucas(&(&p * &p)));
    }

    macro_rules! test_pseudo_primes {
        ($name:ident, $cond:expr, $want:expr) => {
            #[test]
            fn $name() {
                let mut i = 3;
                let mut want: &[u64] = &$want;
                while i < 100000 {
                    let n = BigUint::from_u64(i).unwrap();
                    let pseudo = $cond(&n);
                    if pseudo && (want.is_empty() || i != want[0]) {
                        panic!("cond({}) = true, want false", i);
                    } else if !pseudo && !want.is_empty() && i == want[0] {
                        panic!("cond({}) = false, want true", i);
                    }
                    if !want.is_empty() && i == want[0] {
                        want = &want[1..];
                    }
                    i += 2;
                }

                if !want.is_empty() {
                    panic!("forgot to test: {:?}", want);
                }
            }
        };
    }

    fn miller_rabin_base2(n: &BigUint) -> bool {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        probably_prime_miller_rabin(&mut rng, n, 1, true)
    }

    test_pseudo_primes!(
        test_probably_prime_miller_rabin,
        |n| miller_rabin_base2(n) && !probably_prime_lucas(n),
        [
            2047, 3277, 4033, 4681, 8321, 15841, 29341, 42799, 49141, 52633, 65281, 74665, 80581,
            85489, 88357, 90751,
        ]
    );

    test_pseudo_primes!(
        test_probably_prime_lucas,
        |n| probably_prime_lucas(n) && !miller_rabin_base2(n),
        [989, 3239, 5777, 10877, 27971, 29681, 30739, 31631, 39059, 72389, 73919, 75077]
    );
}
