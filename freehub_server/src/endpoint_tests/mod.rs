mod helpers;

mod gigs;
