// The fixed catalog of sample programs. Each becomes one output directory
// holding its derivation trace and its parse tree.

pub fn catalog() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "GCD",
            "
            begin
            while M != N do
                if M > N then
                    M := M - N
                else
                    N := N - M
            end
            ",
        ),
        (
            "A plus B to R",
            "
            begin
                R := A;
                I := 0;
                while I < B do
                begin
                    R := R + 1;
                    I := I + 1
                end
            end
            ",
        ),
        (
            "A mul B to R",
            "
            begin
                if B < 0 then
                begin
                    A := 0 - A;
                    B := 0 - B
                end;
                R := 0;
                while B > 0 do
                begin
                    R := R + A;
                    B := B - 1
                end
            end
            ",
        ),
        (
            "A div B to Q, A mod B to R",
            "
            begin
                Q := 0;
                R := A;
                while R >= D do
                begin
                    Q := Q + 1;
                    R := R - D
                end
            end
            ",
        ),
        (
            "N! to R",
            "
            begin
                if N < 0 then
                    R := 0
                else
                begin
                    R := 1;
                    while N > 1 do
                    begin
                        R := R * N;
                        N := N - 1
                    end
                end
            end
            ",
        ),
        (
            "A pow B to R",
            "
            begin
                R := 1;
                while B > 0 do
                begin
                    P := 0;
                    while R > 0 do
                    begin
                        P := P + A;
                        R := R - 1
                    end;
                    R := P;
                    B := B - 1
                end
            end
            ",
        ),
        (
            "floor(logX(Y))",
            "
            begin
                R := 0;
                M := 0;
                while Y > 1 do
                begin
                    R := R + 1;
                    Y := Y / X;
                    M := Y % X
                end;
                if M > 0 then
                    R := R - 1
            end
            ",
        ),
    ]
}
