mod check;
mod operations;
mod run;
